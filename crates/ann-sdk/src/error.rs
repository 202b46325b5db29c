use thiserror::Error;

use crate::summary::SummaryError;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("--{name} is required")]
    MissingArgument { name: &'static str },

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error(transparent)]
    Store(#[from] ann_store::StoreError),
}

pub type SdkResult<T> = Result<T, SdkError>;
