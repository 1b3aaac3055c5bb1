use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, MessageResponse, OtpRequest, OtpVerifyRequest, PublicUser,
            RefreshRequest, RegisterRequest,
        },
        is_valid_email,
        jwt::{AuthUser, JwtKeys},
        otp,
        password::{hash_password, verify_password},
        repo::User,
    },
    email::Delivery,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/otp/request", post(otp_request))
        .route("/auth/otp/verify", post(otp_verify))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn token_pair(
    state: &AppState,
    user: &User,
) -> Result<AuthResponse, (axum::http::StatusCode, String)> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        (axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let refresh_token = keys.sign_refresh(user.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        (axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            email: user.email.clone(),
        },
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, (axum::http::StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((axum::http::StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Password too short".into(),
        ));
    }

    // Ensure email is not taken
    if let Ok(Some(_)) = User::find_by_email(&state.db, &payload.email).await {
        warn!(email = %payload.email, "email already registered");
        return Err((
            axum::http::StatusCode::CONFLICT,
            "Email already registered".into(),
        ));
    }

    let hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let user = match User::create_with_password(&state.db, &payload.email, &hash).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(token_pair(&state, &user)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (axum::http::StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((axum::http::StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err((
                axum::http::StatusCode::UNAUTHORIZED,
                "Invalid credentials".into(),
            ));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    // OTP-only accounts have no password to check against.
    let Some(hash) = user.password_hash.as_deref() else {
        warn!(email = %payload.email, user_id = %user.id, "password login on passwordless account");
        return Err((
            axum::http::StatusCode::UNAUTHORIZED,
            "Invalid credentials".into(),
        ));
    };

    let ok = match verify_password(&payload.password, hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "verify_password failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err((
            axum::http::StatusCode::UNAUTHORIZED,
            "Invalid credentials".into(),
        ));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(token_pair(&state, &user)?))
}

#[instrument(skip(state, payload))]
pub async fn otp_request(
    State(state): State<AppState>,
    Json(mut payload): Json<OtpRequest>,
) -> Result<Json<MessageResponse>, (axum::http::StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((axum::http::StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    let (record, delivery) = match otp::issue(&state, &payload.email).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, email = %payload.email, "failed to issue OTP");
            return Err((
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send code. Please try again.".into(),
            ));
        }
    };

    info!(email = %payload.email, otp_id = %record.id, ?delivery, "OTP issued");
    let message = match delivery {
        Delivery::Sent => "OTP sent successfully",
        Delivery::Logged => "OTP generated (check logs)",
    };
    Ok(Json(MessageResponse {
        message: message.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn otp_verify(
    State(state): State<AppState>,
    Json(mut payload): Json<OtpVerifyRequest>,
) -> Result<Json<AuthResponse>, (axum::http::StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();
    payload.code = payload.code.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((axum::http::StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    if payload.code.len() != 6 || !payload.code.bytes().all(|b| b.is_ascii_digit()) {
        warn!(email = %payload.email, "malformed OTP code");
        return Err((
            axum::http::StatusCode::BAD_REQUEST,
            "Code must be 6 digits".into(),
        ));
    }

    let record = match otp::verify(&state, &payload.email, &payload.code).await {
        Ok(r) => r,
        Err(otp::VerifyError::Invalid) => {
            warn!(email = %payload.email, "OTP invalid");
            return Err((
                axum::http::StatusCode::UNAUTHORIZED,
                "Invalid code. Please check the code and try again.".into(),
            ));
        }
        Err(otp::VerifyError::Used) => {
            warn!(email = %payload.email, "OTP already used");
            return Err((
                axum::http::StatusCode::UNAUTHORIZED,
                "This code has already been used.".into(),
            ));
        }
        Err(otp::VerifyError::Expired) => {
            warn!(email = %payload.email, "OTP expired");
            return Err((
                axum::http::StatusCode::UNAUTHORIZED,
                "This code has expired. Please request a new one.".into(),
            ));
        }
        Err(otp::VerifyError::Db(e)) => {
            error!(error = %e, email = %payload.email, "OTP verify failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    // Passwordless sign-in with server-controlled user creation.
    let user = match User::find_or_create_passwordless(&state.db, &payload.email).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, email = %payload.email, "find_or_create user failed");
            return Err((axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(user_id = %user.id, email = %user.email, otp_id = %record.id, "user logged in via OTP");
    Ok(Json(token_pair(&state, &user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (axum::http::StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (axum::http::StatusCode::UNAUTHORIZED, format!("{}", e)))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| (axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((
            axum::http::StatusCode::UNAUTHORIZED,
            "User not found".to_string(),
        ))?;

    Ok(Json(token_pair(&state, &user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, (axum::http::StatusCode, String)> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "user lookup failed");
            (axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or((
            axum::http::StatusCode::UNAUTHORIZED,
            "User not found".to_string(),
        ))?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}
