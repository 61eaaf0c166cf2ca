use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use photoview::api::HttpApi;
use photoview::bootstrap::{bootstrap, SessionStatus};
use photoview::config::{Cli, Command, Config};
use photoview::context::AppContext;
use photoview::db;
use photoview::flows::{self, LoginOutcome};
use photoview::models::{Credentials, ImageUpload, RegisterOutcome, Registration};
use photoview::session::SqliteTokenStore;
use photoview::view;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::debug!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Token storage
    let pool = db::create_pool(config.db_path())?;
    db::run_migrations(&pool)?;

    let api = HttpApi::new(&config.api)?;
    let ctx = AppContext::new(Arc::new(api), Arc::new(SqliteTokenStore::new(pool)))
        .with_policy(config.bootstrap.secondary_failures)
        .with_guest(config.guest_credentials());

    match cli.command {
        Command::Login { email, password } => {
            let creds = Credentials { email, password };
            report_login(&ctx, flows::login(&ctx, &creds).await?).await
        }
        Command::Guest => report_login(&ctx, flows::guest_login(&ctx).await?).await,
        Command::Register {
            email,
            password,
            confirm,
        } => {
            let form = Registration {
                email,
                password,
                password_confirmation: confirm,
            };
            match flows::register(&ctx, &form).await? {
                RegisterOutcome::Created { user_id } => {
                    println!("Registered user {}. Log in to continue.", user_id);
                    Ok(())
                }
                RegisterOutcome::EmailTaken { message } => bail!("{}", message),
            }
        }
        Command::Logout => {
            flows::logout(&ctx).await?;
            println!("Logged out");
            Ok(())
        }
        Command::Feed => {
            require_session(&ctx).await?;
            let auth = ctx.store.auth().await;
            let posts = ctx.store.post().await;
            let cards = view::feed(&auth, &posts, ctx.api.like_model());
            if cards.is_empty() {
                println!("No posts yet");
            }
            for card in cards {
                println!("{}", card);
            }
            Ok(())
        }
        Command::Whoami => {
            require_session(&ctx).await?;
            print_me(&ctx).await;
            Ok(())
        }
        Command::Post { title, image } => {
            require_session(&ctx).await?;
            let image = ImageUpload::from_path(&image).await?;
            let post = flows::new_post(&ctx, &title, Some(image)).await?;
            println!("Posted #{} {}", post.id, post.title);
            Ok(())
        }
        Command::Comment { post, text } => {
            require_session(&ctx).await?;
            flows::post_comment(&ctx, post, &text).await?;
            println!("Commented on #{}", post);
            Ok(())
        }
        Command::Like { post } => {
            require_session(&ctx).await?;
            if flows::toggle_like(&ctx, post).await? {
                println!("Liked #{}", post);
            } else {
                println!("Unliked #{}", post);
            }
            Ok(())
        }
        Command::Profile { nickname, image } => {
            require_session(&ctx).await?;
            let image = match image {
                Some(path) => Some(ImageUpload::from_path(&path).await?),
                None => None,
            };
            let profile = flows::update_profile(&ctx, &nickname, image).await?;
            println!("Nickname is now {}", profile.nickname);
            Ok(())
        }
    }
}

async fn require_session(ctx: &AppContext) -> anyhow::Result<()> {
    match bootstrap(ctx).await? {
        SessionStatus::LoggedIn => Ok(()),
        SessionStatus::LoggedOut => bail!("not logged in"),
    }
}

async fn report_login(ctx: &AppContext, outcome: LoginOutcome) -> anyhow::Result<()> {
    match outcome {
        LoginOutcome::LoggedIn => {
            print_me(ctx).await;
            Ok(())
        }
        LoginOutcome::Rejected => bail!("login failed: check e-mail and password"),
    }
}

async fn print_me(ctx: &AppContext) {
    let auth = ctx.store.auth().await;
    match &auth.my_profile {
        Some(me) => {
            println!("Logged in as {} (user {})", me.nickname, me.user_id);
            if let Some(img) = &me.img_profile {
                println!("Avatar: {}", img);
            }
        }
        None => println!("Logged in"),
    }
}
