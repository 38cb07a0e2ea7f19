use std::path::Path;

use pbsift_core::error::Result;
use pbsift_core::lookup::BatchQueryResponse;

use super::read_input;

pub const USER_NOT_FOUND: &str = "User not found.\n";

/// Summary text for a saved batch-query response.
pub fn run(input: &Path) -> Result<String> {
    let data = read_input(input)?;
    let resp = BatchQueryResponse::from_json_slice(&data)?;
    match resp.found_user() {
        Some(user) => Ok(user.summary()),
        None => {
            tracing::info!(records = resp.info.len(), "response has no existing user");
            Ok(USER_NOT_FOUND.to_string())
        }
    }
}
