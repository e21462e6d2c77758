use thiserror::Error;

#[derive(Error, Debug)]
pub enum CashflowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message} (line {line} in {file})")]
    Format {
        file: String,
        line: usize,
        message: String,
    },

    #[error("duplicate category code {code} (line {line} in {file})")]
    DuplicateCategory {
        code: String,
        file: String,
        line: usize,
    },

    #[error("parent category {parent} missing or defined after child category {child}")]
    MissingParent { parent: String, child: String },

    #[error("undefined category code {code} (line {line} in {file})")]
    UndefinedCategory {
        code: String,
        file: String,
        line: usize,
    },

    #[error("no usable records in {file}")]
    Empty { file: String },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CashflowError>;
