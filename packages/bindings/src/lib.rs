use napi::Result as NapiResult;
use napi_derive::napi;

use sacjd_core::amortization::sacjd::{self, SacjdInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// JSON in, JSON out: a `SacjdInput` document to the full result envelope.
#[napi]
pub fn calculate_sacjd_schedule(input_json: String) -> NapiResult<String> {
    let input: SacjdInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sacjd::calculate_sacjd_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Full-precision period rows, without rounding or envelope.
#[napi]
pub fn project_sacjd_periods(input_json: String) -> NapiResult<String> {
    let input: SacjdInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let periods = sacjd::project_periods(&input).map_err(to_napi_error)?;
    serde_json::to_string(&periods).map_err(to_napi_error)
}
