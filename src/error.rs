use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),
    
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
    
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),
    
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),
    
    #[error("Date/time arithmetic out of range: {0}")]
    OutOfRange(String),
    
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
