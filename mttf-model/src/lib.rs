pub mod encoder;
pub mod forest;
pub mod predictor;

pub use encoder::{EncoderSet, LabelEncoder};
pub use forest::{DecisionTree, RandomForestRegressor};
pub use predictor::Predictor;
