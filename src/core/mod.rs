pub mod encoding;
pub mod etl;
pub mod pipeline;
pub mod preprocess;
pub mod table_io;

pub use crate::domain::model::{Table, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
