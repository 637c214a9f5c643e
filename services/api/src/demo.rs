use crate::infra::cli_model_config;
use clap::Args;
use pulseguard::error::AppError;
use pulseguard::workflows::hypertension::{
    read_questionnaires, AssessmentService, AssessmentView, QuestionnaireField, RawInput,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file holding one questionnaire as a flat object of answers
    #[arg(long, conflicts_with = "csv", required_unless_present = "csv")]
    pub(crate) input: Option<PathBuf>,
    /// CSV export with one questionnaire per row
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Model artifact to use instead of APP_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Model artifact to use instead of APP_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Use a high-risk sample instead of the low-risk one
    #[arg(long)]
    pub(crate) high_risk: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs { input, csv, model } = args;
    let service = AssessmentService::from_config(&cli_model_config(model)?);

    if let Some(path) = input {
        let raw: RawInput = serde_json::from_reader(File::open(path)?)?;
        let view = service.assess(&raw)?;
        render_assessment(&view);
        return Ok(());
    }

    if let Some(path) = csv {
        let rows = read_questionnaires(File::open(path)?)?;
        for (index, raw) in rows.iter().enumerate() {
            println!("\nRow {}", index + 1);
            match service.assess(raw) {
                Ok(view) => render_assessment(&view),
                Err(err) => println!("  error: {}", err.user_message()),
            }
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { model, high_risk } = args;
    let service = AssessmentService::from_config(&cli_model_config(model)?);

    let sample = if high_risk {
        high_risk_sample()
    } else {
        low_risk_sample()
    };

    println!("PulseGuard hypertension assessment demo");
    for (key, value) in sample.values() {
        println!("  {key}: {value}");
    }

    let view = service.assess(&sample)?;
    render_assessment(&view);
    Ok(())
}

fn render_assessment(view: &AssessmentView) {
    if let Some(notice) = view.notice {
        println!("  note: {notice}");
    }
    println!(
        "  stage: {} ({}) confidence {:.2}%",
        view.stage_label, view.color_code, view.confidence
    );
    for field in &view.defaulted_fields {
        println!("  warning: {field} range not recognized, scored as lowest bucket");
    }
    println!(
        "  {} [{}]",
        view.recommendation.title, view.recommendation.priority
    );
    println!("  {}", view.recommendation.description);
    for action in view.recommendation.actions {
        println!("    - {action}");
    }
    println!("  assessed at {}", view.assessed_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

fn low_risk_sample() -> RawInput {
    RawInput::new()
        .with(QuestionnaireField::Gender, "Male")
        .with(QuestionnaireField::Age, "18-34")
        .with(QuestionnaireField::History, "No")
        .with(QuestionnaireField::Patient, "No")
        .with(QuestionnaireField::TakeMedication, "No")
        .with(QuestionnaireField::Severity, "Mild")
        .with(QuestionnaireField::BreathShortness, "No")
        .with(QuestionnaireField::VisualChanges, "No")
        .with(QuestionnaireField::NoseBleeding, "No")
        .with(QuestionnaireField::Whendiagnoused, "<1 Year")
        .with(QuestionnaireField::Systolic, "100 - 110")
        .with(QuestionnaireField::Diastolic, "70 - 80")
        .with(QuestionnaireField::ControlledDiet, "Yes")
}

fn high_risk_sample() -> RawInput {
    RawInput::new()
        .with(QuestionnaireField::Gender, "Female")
        .with(QuestionnaireField::Age, "65+")
        .with(QuestionnaireField::History, "Yes")
        .with(QuestionnaireField::Patient, "Yes")
        .with(QuestionnaireField::TakeMedication, "No")
        .with(QuestionnaireField::Severity, "Sever")
        .with(QuestionnaireField::BreathShortness, "Yes")
        .with(QuestionnaireField::VisualChanges, "Yes")
        .with(QuestionnaireField::NoseBleeding, "Yes")
        .with(QuestionnaireField::Whendiagnoused, ">5 Years")
        .with(QuestionnaireField::Systolic, "130+")
        .with(QuestionnaireField::Diastolic, "100+")
        .with(QuestionnaireField::ControlledDiet, "No")
}
