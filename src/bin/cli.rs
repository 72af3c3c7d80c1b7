use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use istudio::cli::seeder::{SeedCounts, clear_seeded_data, seed_database};
use istudio::cli::create_admin;
use istudio::modules::tables::service::TableService;
use istudio_config::CatalogConfig;

#[derive(Parser)]
#[command(name = "istudio-cli")]
#[command(about = "iStudio CLI - Administrative tools for the iStudio API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Full name of the admin
        #[arg(short = 'n', long)]
        full_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake accounts and notes
    Seed {
        /// Number of editor accounts to create
        #[arg(long, default_value = "2")]
        editors: usize,

        /// Number of regular accounts to create
        #[arg(long, default_value = "5")]
        users: usize,

        /// Notes per seeded account
        #[arg(long, default_value = "10")]
        notes: usize,
    },
    /// Clear all seeded data (keeps real accounts)
    ClearSeed,
    /// Run table discovery and print the result
    ProbeTables,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            full_name,
            email,
            password,
        } => handle_create_admin(&pool, full_name, email, password).await,
        Commands::Seed {
            editors,
            users,
            notes,
        } => handle_seed(&pool, editors, users, notes).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
        Commands::ProbeTables => handle_probe_tables(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &sqlx::postgres::PgPool,
    full_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let full_name = full_name.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Full name")
            .interact_text()
            .expect("Failed to read full name")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    match create_admin(pool, &full_name, &email, &password).await {
        Ok(_) => {
            println!("\n✅ Admin created successfully!");
            println!("   Email: {}", email);
            println!("   Name: {}", full_name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &sqlx::postgres::PgPool, editors: usize, users: usize, notes: usize) {
    let counts = SeedCounts {
        editors,
        users,
        notes_per_user: notes,
    };

    if let Err(e) = seed_database(pool, counts).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &sqlx::postgres::PgPool) {
    if let Err(e) = clear_seeded_data(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}

async fn handle_probe_tables(pool: &sqlx::postgres::PgPool) {
    let config = CatalogConfig::from_env();
    let discovery = TableService::list_tables(pool, &config).await;

    if discovery.requires_setup {
        println!("⚠️  Discovery found no tables.");
        if let Some(instructions) = &discovery.instructions {
            println!("   {}", instructions);
        }
        std::process::exit(1);
    }

    match discovery.source {
        Some(source) => println!("Discovered via {:?}:", source),
        None => println!("Discovered:"),
    }
    for table in &discovery.tables {
        println!("  - {}", table);
    }
}
