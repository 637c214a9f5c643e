use std::io::Read;

use super::normalizer::clean_header;
use super::questionnaire::{QuestionnaireField, RawInput};

/// Batch questionnaire file could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("questionnaire export is missing the {0} column")]
    MissingColumn(QuestionnaireField),
}

/// Parses a CSV export with one questionnaire per row.
///
/// Headers must name every questionnaire field; other columns are ignored. Cells are
/// kept verbatim, as a JSON submission would be, except that empty cells are left out of
/// the row so validation reports them as missing answers.
pub fn read_questionnaires<R: Read>(reader: R) -> Result<Vec<RawInput>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<Option<QuestionnaireField>> = csv_reader
        .headers()?
        .iter()
        .map(|header| QuestionnaireField::from_name(&clean_header(header)))
        .collect();

    if let Some(missing) = QuestionnaireField::ALL
        .into_iter()
        .find(|field| !headers.contains(&Some(*field)))
    {
        return Err(ImportError::MissingColumn(missing));
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut raw = RawInput::new();
        for (field, value) in headers.iter().zip(record.iter()) {
            if let Some(field) = field {
                if !value.is_empty() {
                    raw.insert(*field, value);
                }
            }
        }
        rows.push(raw);
    }

    Ok(rows)
}
