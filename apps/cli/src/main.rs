use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ApiClient, Document, DocumentViewer, FileSessionStore, FlowContext, LoginCredentials, Outcome,
    Route, Router, SubmissionForm, View,
};
use shared::domain::{is_known_campus, LoginMode, CAMPUSES};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "handbook", about = "Handbook acknowledgment client")]
struct Cli {
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in. With --admin, log in to the submission list instead.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        admin: bool,
    },
    /// Acknowledge the handbook for a campus.
    Submit {
        #[arg(long)]
        campus: String,
        #[arg(long)]
        agree: bool,
    },
    /// Show where the handbook document lives.
    Handbook,
    /// Print every submission, optionally filtered (admin only).
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Logout,
    /// Show which view this client would land on. Without --admin the
    /// check starts from the user login, so an admin session reports /form.
    Status {
        #[arg(long)]
        admin: bool,
    },
}

struct PrintDocumentViewer;

impl DocumentViewer for PrintDocumentViewer {
    fn open(&self, document: &Document) {
        println!("{}: {}", document.title, document.url);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings()?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = data_dir;
    }

    let api = ApiClient::with_timeout(
        &settings.server_url,
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    let session = Arc::new(FileSessionStore::in_dir(settings.session_dir()));
    let ctx = FlowContext::with_viewer(api, session, Arc::new(PrintDocumentViewer))?;
    let router = Router::new(ctx.clone());

    match cli.command {
        Command::Login {
            username,
            password,
            admin,
        } => {
            let login = login_route(admin);
            let (View::Login(flow) | View::AdminLogin(flow)) = router.enter(login.path()).await
            else {
                bail!("login view unavailable");
            };
            if ctx.navigator.current().await != login {
                println!("already logged in");
                report(&ctx).await;
                return Ok(());
            }
            let outcome = flow
                .submit(LoginCredentials::new(username, password))
                .await;
            finish(&ctx, outcome).await
        }
        Command::Submit { campus, agree } => {
            if !is_known_campus(&campus) {
                warn!(%campus, known = ?CAMPUSES, "campus not recognised; the server may reject it");
            }
            let View::Form(flow) = router.settle(Route::Form.path()).await else {
                report(&ctx).await;
                bail!("not logged in; run `handbook login` first");
            };
            let outcome = flow.submit(&SubmissionForm::new(campus, agree)).await;
            finish(&ctx, outcome).await
        }
        Command::Handbook => {
            match router.settle(Route::Form.path()).await {
                View::Form(flow) => flow.open_document(),
                _ => {
                    if let View::Done(flow) = router.enter_route(Route::Done).await {
                        flow.open_document();
                    }
                }
            }
            Ok(())
        }
        Command::List { search } => {
            let View::AdminList(flow) = router.enter(Route::AdminList.path()).await else {
                bail!("admin list view unavailable");
            };
            if ctx.navigator.current().await != Route::AdminList {
                report(&ctx).await;
                bail!("not logged in as admin; run `handbook login --admin` first");
            }
            if let Some(message) = ctx.alert.visible_message().await {
                bail!(message);
            }
            flow.set_filter(&search).await;
            for entry in flow.display_list().await {
                println!("{}", serde_json::to_string(&entry)?);
            }
            Ok(())
        }
        Command::Logout => {
            if let View::Done(flow) = router.enter_route(Route::Done).await {
                flow.logout().await;
            }
            report(&ctx).await;
            Ok(())
        }
        Command::Status { admin } => {
            let view = router.settle(login_route(admin).path()).await;
            println!("view: {}", view.route());
            report(&ctx).await;
            Ok(())
        }
    }
}

fn login_route(admin: bool) -> Route {
    let mode = if admin {
        LoginMode::Admin
    } else {
        LoginMode::User
    };
    Route::login_for(mode)
}

async fn report(ctx: &FlowContext) {
    println!("route: {}", ctx.navigator.current().await);
    if let Some(message) = ctx.alert.visible_message().await {
        println!("alert: {message}");
    }
}

async fn finish(ctx: &FlowContext, outcome: Outcome) -> Result<()> {
    report(ctx).await;
    match outcome {
        Outcome::Failed(err) => bail!(err),
        Outcome::Busy => bail!("another request is still pending"),
        Outcome::Navigated(_) | Outcome::Loaded { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_route_follows_admin_flag() {
        assert_eq!(login_route(false), Route::Login);
        assert_eq!(login_route(true), Route::AdminLogin);

        let cli = Cli::try_parse_from(["handbook", "status", "--admin"]).expect("parse");
        assert!(matches!(cli.command, Command::Status { admin: true }));
    }
}
