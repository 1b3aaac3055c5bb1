use rand::Rng;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::auth::repo::OtpCode;
use crate::email::Delivery;
use crate::newsletter::enroll_best_effort;
use crate::state::AppState;

/// Codes expire five minutes after issue.
pub const OTP_TTL: Duration = Duration::minutes(5);

/// Uniformly drawn from [100000, 999999], so always exactly six digits.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999u32).to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("invalid code")]
    Invalid,
    #[error("code already used")]
    Used,
    #[error("code expired")]
    Expired,
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

/// Issue a fresh code for `email`: best-effort newsletter enrollment,
/// persist the code with its expiry, then hand it to the mailer. Email
/// delivery failure is non-fatal once the row exists; the code falls
/// back to the server log so the login can still complete.
pub async fn issue(state: &AppState, email: &str) -> anyhow::Result<(OtpCode, Delivery)> {
    enroll_best_effort(state.newsletter.as_ref(), email).await;

    let code = generate_code();
    let expires_at = OffsetDateTime::now_utc() + OTP_TTL;
    let record = OtpCode::insert(&state.db, email, &code, expires_at).await?;

    let delivery = match state.mailer.send_otp(email, &code).await {
        Ok(d) => d,
        Err(e) => {
            warn!(error = %e, %email, "failed to send OTP email");
            info!(%email, %code, "OTP not delivered; check logs");
            Delivery::Logged
        }
    };

    Ok((record, delivery))
}

/// Redeem a code: select the most recent unused, unexpired row for the
/// pair, flip its `used` flag, and return it. When nothing matches, a
/// second unfiltered lookup distinguishes "already used" and "expired"
/// from a plain wrong code.
pub async fn verify(state: &AppState, email: &str, code: &str) -> Result<OtpCode, VerifyError> {
    if let Some(row) = OtpCode::find_active(&state.db, email, code).await? {
        // A concurrent verify may have consumed the row in between.
        if !OtpCode::consume(&state.db, row.id).await? {
            return Err(VerifyError::Used);
        }
        return Ok(row);
    }

    match OtpCode::find_latest(&state.db, email, code).await? {
        Some(row) if row.used => Err(VerifyError::Used),
        Some(row) if row.expires_at <= OffsetDateTime::now_utc() => Err(VerifyError::Expired),
        _ => Err(VerifyError::Invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn generated_codes_are_six_digits() {
        let re = Regex::new(r"^[0-9]{6}$").unwrap();
        for _ in 0..1000 {
            let code = generate_code();
            assert!(re.is_match(&code), "bad code: {}", code);
        }
    }

    #[test]
    fn generated_codes_stay_in_range() {
        for _ in 0..1000 {
            let n: u32 = generate_code().parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn ttl_is_five_minutes() {
        assert_eq!(OTP_TTL.whole_seconds(), 300);
    }
}
