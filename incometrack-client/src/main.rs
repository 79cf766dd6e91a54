//! # IncomeTrack CLI
//!
//! Terminal front end for the IncomeTrack API.
//!
//! ## Usage
//!
//! ```bash
//! incometrack register <email> <password> <confirm>
//! incometrack login <email> <password>
//! incometrack logout
//! incometrack whoami
//! incometrack month [MONTH YEAR]
//! incometrack add <YYYY-MM-DD> <amount> <source...>
//! incometrack delete <entry-id>
//! incometrack target [amount]
//! incometrack ytd
//! incometrack yearly [offset] [--compact]
//! incometrack dashboard
//! ```
//!
//! The API location and session file come from `INCOMETRACK_API_URL` and
//! `INCOMETRACK_SESSION_FILE`.

use anyhow::{bail, Context};
use chrono::Utc;
use incometrack_client::{
    api::{ApiClient, DeleteOutcome},
    config::ClientConfig,
    dashboard::Dashboard,
    error::ClientError,
    forms::{EntryForm, LoginForm, RegisterForm, TargetForm},
    session::{SessionContext, SessionStore},
    view::{self, Carousel, MonthCursor},
};
use incometrack_shared::summary::period::YearMonth;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const USAGE: &str = "usage: incometrack <register|login|logout|whoami|month|add|delete|target|ytd|yearly|dashboard> [args]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incometrack_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let config = ClientConfig::from_env();
    let api = ApiClient::new(&config.api_url)?;
    let mut ctx = SessionContext::load(SessionStore::new(config.session_file.clone()))
        .with_context(|| format!("Failed to read session from {}", config.session_file.display()))?;

    match run(&api, &mut ctx, command, rest).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if let Some(client_error) = e.downcast_ref::<ClientError>() {
                eprintln!("{}", client_error.user_message());
                if client_error.requires_login() {
                    eprintln!("Run `incometrack login <email> <password>` to continue.");
                }
                std::process::exit(1);
            }
            Err(e)
        }
    }
}

async fn run(
    api: &ApiClient,
    ctx: &mut SessionContext,
    command: &str,
    args: &[String],
) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();

    match (command, args) {
        ("register", [email, password, confirm]) => {
            let credentials = RegisterForm {
                email: email.clone(),
                password: password.clone(),
                confirm_password: confirm.clone(),
            }
            .validate()?;
            let user = api.register(ctx, &credentials).await?;
            println!("Registered and logged in as {}", user.email);
        }
        ("login", [email, password]) => {
            let credentials = LoginForm {
                email: email.clone(),
                password: password.clone(),
            }
            .validate()?;
            let user = api.login(ctx, &credentials).await?;
            println!("Logged in as {}", user.email);
        }
        ("logout", []) => {
            api.logout(ctx)?;
            println!("Logged out");
        }
        ("whoami", []) => match ctx.user() {
            Some(user) => println!("{} ({})", user.email, user.id),
            None => return Err(ClientError::NotAuthenticated.into()),
        },
        ("month", []) => show_month(api, ctx, MonthCursor::new(today).period()).await?,
        ("month", [month, year]) => {
            let period = YearMonth::new(year.parse()?, month.parse()?)?;
            show_month(api, ctx, period).await?;
        }
        ("add", [date, amount, source @ ..]) if !source.is_empty() => {
            let entry = EntryForm {
                date: date.clone(),
                amount: amount.clone(),
                source: source.join(" "),
            }
            .validate()?;
            let created = api.create_entry(ctx, &entry).await?;
            println!(
                "Added {} from {} on {} [{}]",
                view::format_money(created.amount),
                created.source,
                created.date,
                created.id
            );
            show_month(api, ctx, YearMonth::from_date(created.date)).await?;
        }
        ("delete", [id]) => {
            let id = Uuid::parse_str(id).context("Entry id must be a UUID")?;
            match api.delete_entry(ctx, id).await? {
                DeleteOutcome::Deleted => println!("Entry deleted"),
                DeleteOutcome::AlreadyGone => println!("Entry was already deleted"),
            }
        }
        ("target", []) => {
            let target = api.get_target(ctx).await?;
            println!("Monthly target: {}", view::format_money(target));
        }
        ("target", [amount]) => {
            let amount = TargetForm {
                amount: amount.clone(),
            }
            .validate()?;
            let target = api.set_target(ctx, amount).await?;
            println!("Monthly target set to {}", view::format_money(target.monthly_target));
        }
        ("ytd", []) => {
            let ytd = api.year_to_date(ctx).await?;
            println!("{}", view::render_year_to_date(&ytd));
        }
        ("yearly", rest) => {
            let compact = rest.iter().any(|a| a == "--compact");
            let offset = rest
                .iter()
                .find(|a| *a != "--compact")
                .map(|a| a.parse::<usize>())
                .transpose()
                .context("Offset must be a number")?;

            let yearly = api.yearly(ctx).await?;
            let mut carousel = Carousel::at_end(yearly.len(), compact);
            if let Some(back) = offset {
                for _ in 0..back {
                    carousel.prev();
                }
            }
            print!("{}", view::render_carousel(&yearly, &carousel));
        }
        ("dashboard", []) => {
            let mut dashboard = Dashboard::new(today, false);
            dashboard.reload(api, ctx).await?;
            print!("{}", dashboard.render());
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

async fn show_month(
    api: &ApiClient,
    ctx: &mut SessionContext,
    period: YearMonth,
) -> anyhow::Result<()> {
    let summary = api.monthly_summary(ctx, period).await?;
    let entries = api.list_entries(ctx, Some(period)).await?;
    print!("{}", view::render_month(&summary, &entries));
    Ok(())
}
