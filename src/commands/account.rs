//! Account command handlers: `signup`, `login` and `logout`.

use crate::args::CredentialsArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::session::Session;
use crate::{Config, Result};
use anyhow::anyhow;
use tracing::debug;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Registers a new user. The user is not logged in afterwards.
///
/// # Errors
/// - `ErrorType::Request` if the credentials are malformed or the username is taken.
pub async fn signup(config: Config, args: CredentialsArgs) -> Result<Out<()>> {
    let (username, password) = validate_credentials(&args, &SIGNUP)?;
    let registered = config
        .db()
        .register_user(username, password)
        .await
        .pub_result(ErrorType::Database)?;
    if !registered {
        return Err(anyhow!("Registration failed. Username may already exist."))
            .pub_result(ErrorType::Request);
    }
    Ok("Account created successfully! Please log in.".into())
}

/// Checks the credentials and, if they match a user, saves the session for that user.
///
/// # Errors
/// - `ErrorType::Request` if the credentials are malformed.
/// - `ErrorType::Auth` if no user has this username and password.
pub async fn login(config: Config, args: CredentialsArgs) -> Result<Out<Session>> {
    let (username, password) = validate_credentials(&args, &LOGIN)?;
    let user = config
        .db()
        .authenticate(username, password)
        .await
        .pub_result(ErrorType::Database)?;
    let Some(user) = user else {
        return Err(anyhow!("Invalid username or password.")).pub_result(ErrorType::Auth);
    };

    let session = Session::new(&user);
    session.save(&config).await.pub_result(ErrorType::Config)?;
    Ok(Out::new(
        format!("Login Successful! Welcome, {}.", user.username()),
        session,
    ))
}

/// Removes the session. Logging out when nobody is logged in is not an error.
pub async fn logout(config: Config) -> Result<Out<()>> {
    let was_logged_in = Session::clear(&config)
        .await
        .pub_result(ErrorType::Config)?;
    if was_logged_in {
        Ok("Logged out.".into())
    } else {
        Ok("Nobody was logged in.".into())
    }
}

/// The wording of the validation messages, which differs between signup and login.
struct Prompts {
    missing: &'static str,
    not_an_email: &'static str,
}

const SIGNUP: Prompts = Prompts {
    missing: "Please fill in all fields.",
    not_an_email: "Please enter a valid email address.",
};

const LOGIN: Prompts = Prompts {
    missing: "Please enter username and password.",
    not_an_email: "Please enter a valid email format.",
};

/// Trims both fields and checks them. Returns the trimmed values.
fn validate_credentials<'a>(
    args: &'a CredentialsArgs,
    prompts: &Prompts,
) -> Result<(&'a str, &'a str)> {
    let username = args.username().trim();
    let password = args.password().trim();
    let problem = if username.is_empty() || password.is_empty() {
        Some(prompts.missing.to_string())
    } else if !looks_like_email(username) {
        Some(prompts.not_an_email.to_string())
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        ))
    } else {
        None
    };
    match problem {
        Some(message) => {
            debug!("Rejected credentials for '{username}': {message}");
            Err(anyhow!(message)).pub_result(ErrorType::Request)
        }
        None => Ok((username, password)),
    }
}

/// A loose e-mail check: `local@domain.tld` with no whitespace and no empty domain labels.
fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
