use actix_web::{HttpResponse, web};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::{claims_for, generate_access_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    error::AppError,
    model::{
        EMAIL_MAX, NAME_MAX, check_len,
        leave_request::non_blank,
        role::Role,
        user::{Account, NewAccount},
    },
    models::{LoginReqDto, RegisterReq, TokenResponse},
    store::Stores,
    utils::email_filter,
};

const MIN_PASSWORD_LEN: usize = 6;

/// Employee number for a self-registered account.
fn new_matricule() -> String {
    format!("EMP{}", Uuid::new_v4().to_simple())
}

fn issue_token(account: &Account, config: &Config) -> Result<String, AppError> {
    let claims = claims_for(account, config.access_token_ttl);
    generate_access_token(&claims, &config.jwt_secret).map_err(|e| {
        error!(error = %e, "Failed to sign access token");
        AppError::Internal(e.to_string())
    })
}

/// `true` when no account uses `email` yet.
async fn is_email_available(email: &str, stores: &Stores) -> Result<bool, AppError> {
    // Cuckoo filter: a negative answer is definitive
    if !email_filter::might_exist(email) {
        return Ok(true);
    }

    let existing = stores.accounts.find_by_email(email.to_string()).await?;
    Ok(existing.is_none())
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Missing fields or password mismatch"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_register", skip(req, stores, config))]
pub async fn register(
    req: web::Json<RegisterReq>,
    stores: web::Data<Stores>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();

    let (Some(first_name), Some(last_name), Some(email), Some(password), Some(confirm)) = (
        non_blank(req.first_name),
        non_blank(req.last_name),
        non_blank(req.email),
        req.password.filter(|p| !p.is_empty()),
        req.confirm_password,
    ) else {
        info!("Validation failed: missing registration field");
        return Err(AppError::validation("All fields are required"));
    };

    if password != confirm {
        return Err(AppError::validation("Passwords do not match"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let email = email_filter::normalize(&email);
    check_len("first_name", &first_name, NAME_MAX)?;
    check_len("last_name", &last_name, NAME_MAX)?;
    check_len("email", &email, EMAIL_MAX)?;
    if !is_email_available(&email, stores.get_ref()).await? {
        info!("Registration rejected: email taken");
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let password_hash = hash_password(&password).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        AppError::Internal(e.to_string())
    })?;

    let account = stores
        .accounts
        .create_account(NewAccount {
            email: email.clone(),
            password_hash,
            role: Role::Employee,
            matricule: new_matricule(),
            first_name,
            last_name,
        })
        .await?;

    email_filter::insert(&email);
    info!(user_id = account.id, "Account registered");

    let token = issue_token(&account, config.get_ref())?;
    Ok(HttpResponse::Created().json(TokenResponse {
        message: "Account created successfully".into(),
        token,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(user, stores, config))]
pub async fn login(
    user: web::Json<LoginReqDto>,
    stores: web::Data<Stores>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");
    let user = user.into_inner();

    let (Some(email), Some(password)) = (non_blank(user.email), user.password.filter(|p| !p.is_empty()))
    else {
        info!("Validation failed: empty email or password");
        return Err(AppError::validation("Email and password are required"));
    };

    debug!("Fetching account");
    let Some(account) = stores
        .accounts
        .find_by_email(email_filter::normalize(&email))
        .await?
    else {
        info!("Invalid credentials: unknown email");
        return Err(AppError::Unauthenticated);
    };

    if let Err(e) = verify_password(&password, &account.password_hash) {
        info!(error = %e, user_id = account.id, "Invalid credentials: password mismatch");
        return Err(AppError::Unauthenticated);
    }

    let token = issue_token(&account, config.get_ref())?;
    info!(user_id = account.id, role = %account.role, "Login successful");

    Ok(HttpResponse::Ok().json(TokenResponse {
        message: "Login successful".into(),
        token,
    }))
}
