pub mod models;

pub use models::{
    BatchPoints, FieldValue, InvocationResponse, Precision, ServiceRequest, TimeSeriesPoint,
};
