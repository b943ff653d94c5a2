//! Login and registration form validation.
use serde::Serialize;
use thiserror::Error;

const MIN_PASSWORD_LEN: usize = 4;
const MIN_NAME_LEN: usize = 3;

/// Form field a validation error points at, so the UI can focus it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    /// DOM id of the matching input.
    #[must_use]
    pub const fn input_id(self) -> &'static str {
        match self {
            Self::Name => "nome",
            Self::Email => "email",
            Self::Password => "senha",
            Self::ConfirmPassword => "confirmarSenha",
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Por favor, digite seu nome completo.")]
    NameMissing,
    #[error("O nome deve ter pelo menos 3 caracteres.")]
    NameTooShort,
    #[error("Por favor, digite seu email.")]
    EmailMissing,
    #[error("Por favor, digite um email válido.")]
    EmailInvalid,
    #[error("Por favor, digite sua senha.")]
    PasswordMissing,
    #[error("A senha deve ter pelo menos 4 caracteres.")]
    PasswordTooShort,
    #[error("As senhas não coincidem. Por favor, verifique.")]
    PasswordMismatch,
}

impl ValidationError {
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::NameMissing | Self::NameTooShort => Field::Name,
            Self::EmailMissing | Self::EmailInvalid => Field::Email,
            Self::PasswordMissing | Self::PasswordTooShort => Field::Password,
            Self::PasswordMismatch => Field::ConfirmPassword,
        }
    }
}

/// Credentials body for the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// Body for the customer registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the first rule the form breaks.
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = validate_email(&self.email)?;
        validate_password(&self.password)?;
        Ok(LoginRequest {
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// # Errors
    ///
    /// Returns the first rule the form breaks, checked top to bottom.
    pub fn validate(&self) -> Result<RegistrationRequest, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameMissing);
        }
        if name.chars().count() < MIN_NAME_LEN {
            return Err(ValidationError::NameTooShort);
        }
        let email = validate_email(&self.email)?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(RegistrationRequest {
            name: name.to_string(),
            email,
            password: self.password.clone(),
        })
    }
}

fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(ValidationError::EmailMissing);
    }
    if !email.contains('@') || !email.contains('.') {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(email.to_string())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordMissing);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}
