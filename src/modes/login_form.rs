use crate::input::FormEdit;
use crate::session::{Credentials, Intent};

const MAX_FIELD_LEN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
}

/// Text entry for the login screen
///
/// The session never sees keystrokes, only the `Login`/`Register` intents
/// this form produces.
#[derive(Debug, Clone)]
pub struct LoginForm {
    username: String,
    password: String,
    focus: Field,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: Field::Username,
        }
    }

    pub fn apply(&mut self, edit: FormEdit) -> Option<Intent> {
        match edit {
            FormEdit::Insert(c) => {
                let field = self.focused_mut();
                if !c.is_control() && field.chars().count() < MAX_FIELD_LEN {
                    field.push(c);
                }
                None
            }
            FormEdit::Backspace => {
                self.focused_mut().pop();
                None
            }
            FormEdit::NextField | FormEdit::PrevField => {
                self.focus = match self.focus {
                    Field::Username => Field::Password,
                    Field::Password => Field::Username,
                };
                None
            }
            FormEdit::Submit if self.focus == Field::Username && self.password.is_empty() => {
                self.focus = Field::Password;
                None
            }
            FormEdit::Submit => Some(Intent::Login(self.take_credentials())),
            FormEdit::Register => Some(Intent::Register(self.take_credentials())),
            FormEdit::Clear => {
                self.clear();
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.username.clear();
        self.password.clear();
        self.focus = Field::Username;
    }

    /// Credentials for submission; the password field is emptied
    fn take_credentials(&mut self) -> Credentials {
        let password = std::mem::take(&mut self.password);
        self.focus = Field::Password;
        Credentials::new(self.username.clone(), password)
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password as shown on screen
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    pub fn focus(&self) -> Field {
        self.focus
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}
