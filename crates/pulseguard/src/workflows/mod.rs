pub mod hypertension;
