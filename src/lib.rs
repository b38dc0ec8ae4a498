//! insurance-prep - leak-free preprocessing for insurance cross-sell records
//!
//! Statistics are learned once from a training partition into an immutable
//! [`ParameterBundle`](preprocessing::ParameterBundle) and then applied,
//! unchanged, to the training partition and to held-out data.
//!
//! # Modules
//!
//! - [`preprocessing`] - Fitter, Applier and the fitted components
//! - [`schema`] - Column names of the customer record
//! - [`utils`] - CSV ingestion with a row cap, CSV export, feature matrices
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use insurance_prep::preprocessing::{Applier, Fitter};
//! use insurance_prep::utils::DataLoader;
//!
//! let loader = DataLoader::new();
//! let train = loader.load_csv("data/raw/train.csv")?;
//! let test = loader.load_csv("data/raw/test.csv")?;
//!
//! let bundle = Fitter::new().fit(&train)?;
//! let applier = Applier::new(&bundle);
//! let train_processed = applier.apply_train(&train)?;
//! let test_processed = applier.apply_eval(&test)?;
//! # Ok::<(), insurance_prep::PrepError>(())
//! ```

pub mod error;
pub mod schema;
pub mod preprocessing;
pub mod utils;
pub mod cli;

pub use error::{PrepError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{PrepError, Result};
    pub use crate::preprocessing::{
        Applier, ApplyMode, Fitter, ParameterBundle, PipelineConfig, UNSEEN_CODE,
    };
    pub use crate::utils::{write_csv, DataLoader, FeatureMatrix};
}
