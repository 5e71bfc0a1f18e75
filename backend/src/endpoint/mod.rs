//! Role menus over the controllers
//!
//! Endpoints only collect input and render output, every rule lives in
//! the controllers. A failed action is printed as `[kind] message` and the
//! menu it came from keeps running, only exhausted input ends the session.
mod admin;
pub mod console;
mod course;
mod instructor;
mod learner;

mod tools {
    pub use std::io::{BufRead, Write};

    pub use super::console::{Console, Row};
    pub use super::recover;
    pub use crate::app::App;
    pub use crate::util::{
        auth::Session,
        error::{Error, Result},
        time::display,
    };
}

use tools::*;

use crate::entity::user::Role;

/// Print a failed action and keep going, input errors still propagate
pub fn recover<R: BufRead, W: Write>(console: &mut Console<R, W>, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(Error::Io(err)) => Err(Error::Io(err)),
        Err(err) => console.error(&err),
    }
}

/// shorthand for an optional field shown in a table
pub(crate) fn or_dash(value: Option<impl ToString>) -> String {
    value.map(|x| x.to_string()).unwrap_or_else(|| "-".to_owned())
}

async fn login<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    let email = console.required("Email: ")?;
    let password = console.required("Password: ")?;

    let session = match app.auth.authenticate(&email, &password).await? {
        Some(x) => x,
        None => return console.message("Invalid email or password."),
    };
    console.message(format!("Welcome, {} ({}).", session.email, session.role))?;

    match session.role {
        Role::Admin => admin::panel(app, console, &session).await,
        Role::Instructor => instructor::portal(app, console, &session).await,
        Role::Learner => learner::portal(app, console, &session).await,
    }
}

/// Change the password of the logged in user
async fn change_password<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    session: &Session,
) -> Result<()> {
    let password = console.required("New password: ")?;
    let again = console.required("Repeat new password: ")?;
    if password != again {
        return console.message("Passwords do not match.");
    }
    app.users.update_password(session.user_id, &password).await?;
    console.message("Password updated.")
}

/// Main loop: login until the user exits or input ends
pub async fn run<R: BufRead, W: Write>(app: &App, console: &mut Console<R, W>) -> Result<()> {
    loop {
        match console.menu("Course Catalog", &["Login", "Exit"])? {
            0 => {
                let result = login(app, console).await;
                recover(console, result)?;
            }
            _ => return console.message("Goodbye."),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{controller::user::UserController, init::config::GlobalConfig, test::data};

    async fn app() -> App {
        let db = data::connect().await;
        let crypto = data::crypto();
        UserController::new(db.clone(), crypto.clone())
            .create("root@x.io", "admin", Role::Admin)
            .await
            .unwrap();
        App::with_db(GlobalConfig::default(), db, crypto)
    }

    async fn session(app: &App, script: &[&str]) -> String {
        let input = script.join("\n") + "\n";
        let mut console = Console::new(input.as_bytes(), Vec::new(), 30);
        run(app, &mut console).await.unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[tokio::test]
    async fn admin_then_learner() {
        let app = app().await;
        #[rustfmt::skip]
        let output = session(&app, &[
            "1", "root@x.io", "admin",
            // learner
            "1", "2", "Alice", "alice@x.io", "pw", "", "5",
            // course with two lectures
            "3", "2", "Intro", "", "",
            "5", "1", "2", "Welcome", "Hello there", "2", "Syntax", "", "5", "6",
            // enrollment
            "4", "2", "1", "1", "5",
            "7",
            "1", "alice@x.io", "pw",
            "4", "1", "1", "1", "2",
            "5",
            "7",
            "2",
        ])
        .await;

        assert!(output.contains("Welcome, root@x.io (Administrator)."));
        assert!(output.contains("Learner added with ID 1."));
        assert!(output.contains("Lecture added with ID 2."));
        assert!(output.contains("Enrolled with enrollment ID 1."));
        assert!(output.contains("Hello there"));
        assert!(output.contains("Progress: 50% (In Progress)"));
        assert!(output.ends_with("Goodbye.\n"));
    }
    #[tokio::test]
    async fn failure_keeps_menu_running() {
        let app = app().await;
        #[rustfmt::skip]
        let output = session(&app, &[
            "1", "nobody@x.io", "pw",
            "1", "root@x.io", "admin",
            "4", "2", "7", "7", "5",
            "7",
            "2",
        ])
        .await;

        assert!(output.contains("Invalid email or password."));
        assert!(output.contains("[NotFound] `learner` not found"));
        assert!(output.ends_with("Goodbye.\n"));
    }
}
