use crate::session_file;
use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tally_core::{AuthState, RoleRouteTable, RouteDecision, RouteGuard, SessionStore, TallyConfig};
use tally_http::client::{ClientBuilder, SessionClient};
use tally_http::types::{TransactionFilter, TransactionStatus, TransactionType};

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        email: String,
        #[arg(long, env = "TALLY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and remove the persisted session
    Logout,

    /// Show the current session
    Whoami,

    /// Check what the route guard decides for a path
    Access { path: String },

    /// List the company's users
    Users,

    /// List the company's categories
    Categories,

    /// List the company's products
    Products,

    /// List the company's purchases
    Purchases,

    /// List the company's transactions, optionally filtered
    Transactions {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Balance report for a date range (YYYY-MM-DD)
    Balance {
        start_date: String,
        end_date: String,
    },

    /// Daily balance history for the last seven days
    History,

    /// Request a password recovery e-mail
    ForgotPassword { email: String },

    /// Reset the password with a recovery token
    ResetPassword { token: String, new_password: String },
}

#[derive(Args, Default)]
pub struct FilterArgs {
    /// Transaction type, e.g. FIXED_EXPENSE
    #[arg(long = "type")]
    kind: Option<String>,

    /// Transaction status: PENDING or COMPLETED
    #[arg(long)]
    status: Option<String>,

    #[arg(long)]
    user_id: Option<i64>,

    #[arg(long)]
    category_id: Option<i64>,

    #[arg(long)]
    start_date: Option<String>,

    #[arg(long)]
    end_date: Option<String>,

    #[arg(long)]
    start_due_date: Option<String>,

    #[arg(long)]
    end_due_date: Option<String>,

    #[arg(long)]
    min_value: Option<f64>,

    #[arg(long)]
    max_value: Option<f64>,
}

impl FilterArgs {
    fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.status.is_none()
            && self.user_id.is_none()
            && self.category_id.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.start_due_date.is_none()
            && self.end_due_date.is_none()
            && self.min_value.is_none()
            && self.max_value.is_none()
    }

    fn into_filter(self) -> Result<TransactionFilter> {
        Ok(TransactionFilter {
            kind: self.kind.as_deref().map(parse_transaction_type).transpose()?,
            status: self
                .status
                .as_deref()
                .map(parse_transaction_status)
                .transpose()?,
            user_id: self.user_id,
            category_id: self.category_id,
            start_date: self.start_date,
            end_date: self.end_date,
            start_due_date: self.start_due_date,
            end_due_date: self.end_due_date,
            min_value: self.min_value,
            max_value: self.max_value,
        })
    }
}

fn parse_transaction_type(s: &str) -> Result<TransactionType> {
    Ok(match s {
        "VARIABLE_INCOME" => TransactionType::VariableIncome,
        "FIXED_INCOME" => TransactionType::FixedIncome,
        "VARIABLE_EXPENSE" => TransactionType::VariableExpense,
        "FIXED_EXPENSE" => TransactionType::FixedExpense,
        other => bail!("unknown transaction type: {other}"),
    })
}

fn parse_transaction_status(s: &str) -> Result<TransactionStatus> {
    Ok(match s {
        "PENDING" => TransactionStatus::Pending,
        "COMPLETED" => TransactionStatus::Completed,
        other => bail!("unknown transaction status: {other}"),
    })
}

impl Commands {
    pub async fn execute(self, config: &TallyConfig) -> Result<()> {
        let store = Arc::new(SessionStore::new());
        let session_path = config.session_file();
        if let Some(session) = session_file::load(&session_path) {
            store.set(session);
        }

        let client = ClientBuilder::new()
            .base_url(&config.api.base_url)
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .refresh_skew_secs(config.auth.refresh_skew_secs)
            .build_session(store.clone())?;

        let result = self.run(&client).await;

        // The command may have signed in, refreshed the token, or hit a
        // terminal refresh failure; mirror the store back to disk.
        match store.get() {
            Some(session) if session.is_usable() => session_file::save(&session_path, &session)?,
            _ => session_file::remove(&session_path)?,
        }

        result
    }

    async fn run(self, client: &SessionClient) -> Result<()> {
        match self {
            Commands::Login { email, password } => {
                let session = client.login(&email, &password).await?;
                println!("signed in as {} ({})", session.email, session.role);
            }
            Commands::Logout => {
                client.sign_out();
                println!("signed out");
            }
            Commands::Whoami => match AuthState::resolve(client.store()) {
                AuthState::Authenticated { role } => {
                    let session = client.store().get().context("session disappeared")?;
                    println!("{} ({role})", session.email);
                    if let Some(company_id) = session.company_id {
                        println!("company: {company_id}");
                    }
                    println!("token expires at: {}", session.expires_at);
                }
                _ => println!("not signed in"),
            },
            Commands::Access { path } => {
                let state = AuthState::resolve(client.store());
                let guard = RouteGuard::new(RoleRouteTable::standard());
                match guard.decide(state, &path) {
                    RouteDecision::Allow => println!("allow"),
                    RouteDecision::RedirectToLogin => println!("redirect: /auth/login"),
                    RouteDecision::RedirectToDashboard => println!("redirect: /dashboard"),
                }
            }
            Commands::Users => {
                let users = client.users_by_company(company_id(client)?).await?;
                print_json(&users)?;
            }
            Commands::Categories => {
                let categories = client.categories_by_company(company_id(client)?).await?;
                print_json(&categories)?;
            }
            Commands::Products => {
                let products = client.products_by_company(company_id(client)?).await?;
                print_json(&products)?;
            }
            Commands::Purchases => {
                let purchases = client.purchases_by_company(company_id(client)?).await?;
                print_json(&purchases)?;
            }
            Commands::Transactions { filter } => {
                let transactions = if filter.is_empty() {
                    client.transactions_by_company(company_id(client)?).await?
                } else {
                    client.filter_transactions(&filter.into_filter()?).await?
                };
                print_json(&transactions)?;
            }
            Commands::Balance {
                start_date,
                end_date,
            } => {
                let report = client
                    .balance_calculated(&start_date, &end_date, company_id(client)?)
                    .await?;
                print_json(&report)?;
            }
            Commands::History => {
                let history = client.last_seven_days_history(company_id(client)?).await?;
                print_json(&history)?;
            }
            Commands::ForgotPassword { email } => {
                let response = client.to_public().forgot_password(&email).await?;
                println!("{}", response.message);
            }
            Commands::ResetPassword {
                token,
                new_password,
            } => {
                let response = client
                    .to_public()
                    .reset_password(&token, &new_password)
                    .await?;
                println!("{}", response.message);
            }
        }
        Ok(())
    }
}

fn company_id(client: &SessionClient) -> Result<i64> {
    client
        .store()
        .get()
        .filter(|session| session.is_usable())
        .context("not signed in; run `tally login` first")?
        .company_id
        .context("the session carries no company id")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
