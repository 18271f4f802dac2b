//! Login/Register Page
//!
//! User authentication interface

use memories_types::{AuthResponse, LoginRequest, RegisterRequest};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{api, session, Route};

pub enum LoginMsg {
    UsernameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    Submit,
    ToggleMode,
    Success(AuthResponse),
    Error(String),
}

#[derive(Properties, PartialEq)]
pub struct LoginProps {
    /// Start in account-creation mode.
    #[prop_or(false)]
    pub register: bool,
}

pub struct LoginPage {
    username: String,
    email: String,
    password: String,
    is_register: bool,
    loading: bool,
    error: Option<String>,
}

impl Component for LoginPage {
    type Message = LoginMsg;
    type Properties = LoginProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            is_register: ctx.props().register,
            loading: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            LoginMsg::UsernameChanged(username) => {
                self.username = username;
                true
            }
            LoginMsg::EmailChanged(email) => {
                self.email = email;
                true
            }
            LoginMsg::PasswordChanged(password) => {
                self.password = password;
                true
            }
            LoginMsg::ToggleMode => {
                self.is_register = !self.is_register;
                self.error = None;
                true
            }
            LoginMsg::Submit => {
                self.loading = true;
                self.error = None;

                let username = self.username.clone();
                let email = self.email.clone();
                let password = self.password.clone();
                let is_register = self.is_register;

                ctx.link().send_future(async move {
                    let result = if is_register {
                        api::register(&RegisterRequest {
                            username,
                            email,
                            password,
                        })
                        .await
                    } else {
                        api::login(&LoginRequest { email, password }).await
                    };

                    match result {
                        Ok(response) => LoginMsg::Success(response),
                        Err(err) => LoginMsg::Error(err.message),
                    }
                });

                true
            }
            LoginMsg::Success(response) => {
                self.loading = false;
                session::store(&response.token, &response.user);
                log::info!("Signed in as: {}", response.user.username);

                if let Some(navigator) = ctx.link().navigator() {
                    navigator.push(&Route::Home);
                }
                true
            }
            LoginMsg::Error(message) => {
                self.loading = false;
                self.error = Some(message);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let on_username_change = ctx.link().callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            LoginMsg::UsernameChanged(input.value())
        });

        let on_email_change = ctx.link().callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            LoginMsg::EmailChanged(input.value())
        });

        let on_password_change = ctx.link().callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            LoginMsg::PasswordChanged(input.value())
        });

        let on_submit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            LoginMsg::Submit
        });

        let on_toggle = ctx.link().callback(|_| LoginMsg::ToggleMode);

        let title = if self.is_register {
            "Create Account"
        } else {
            "Sign In"
        };

        let toggle_text = if self.is_register {
            "Already have an account? Sign In"
        } else {
            "Don't have an account? Create one"
        };

        let button_text = if self.loading {
            "Please wait..."
        } else {
            title
        };

        html! {
            <div class="login-container">
                <div class="login-box">
                    <h1>{ "Memories" }</h1>
                    <h2>{ title }</h2>

                    if let Some(ref error) = self.error {
                        <div class="error-message">{ error }</div>
                    }

                    <form onsubmit={on_submit}>
                        if self.is_register {
                            <div class="form-group">
                                <label>{ "Username" }</label>
                                <input
                                    type="text"
                                    placeholder="Pick a username"
                                    value={self.username.clone()}
                                    onchange={on_username_change}
                                    disabled={self.loading}
                                    required={true}
                                />
                            </div>
                        }

                        <div class="form-group">
                            <label>{ "Email" }</label>
                            <input
                                type="email"
                                placeholder="email@example.com"
                                value={self.email.clone()}
                                onchange={on_email_change}
                                disabled={self.loading}
                                required={true}
                            />
                        </div>

                        <div class="form-group">
                            <label>{ "Password" }</label>
                            <input
                                type="password"
                                placeholder="Enter password (min 6 chars)"
                                value={self.password.clone()}
                                onchange={on_password_change}
                                disabled={self.loading}
                                required={true}
                                minlength={"6"}
                            />
                        </div>

                        <button
                            type="submit"
                            class="btn-primary"
                            disabled={self.loading}
                        >
                            { button_text }
                        </button>
                    </form>

                    <div class="login-footer">
                        <button class="btn-link" onclick={on_toggle}>
                            { toggle_text }
                        </button>
                    </div>
                </div>
            </div>
        }
    }
}
