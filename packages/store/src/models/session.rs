use crate::error::StoreError;

/// Input for opening a session. The id is generated by the store.
#[derive(Debug, Clone, Default)]
pub struct NewSession {
    pub user_id: Option<i32>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub payload: String,
}

pub fn validate_new_session(session: &NewSession) -> Result<(), StoreError> {
    if let Some(ip) = &session.ip_address
        && ip.parse::<std::net::IpAddr>().is_err()
    {
        return Err(StoreError::Validation(format!(
            "Invalid IP address '{ip}'"
        )));
    }
    Ok(())
}
