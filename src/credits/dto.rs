use serde::Serialize;

/// Current generation quota for the authenticated user.
#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub credits_remaining: i32,
    pub has_credits: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_response_serializes_both_fields() {
        let json = serde_json::to_string(&CreditsResponse {
            credits_remaining: 8,
            has_credits: true,
        })
        .unwrap();
        assert!(json.contains("\"credits_remaining\":8"));
        assert!(json.contains("\"has_credits\":true"));
    }
}
