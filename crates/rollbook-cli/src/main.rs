use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use rollbook_cli::admin::create_admin;
use rollbook_cli::seeder::{self, SeedConfig};
use rollbook_db::{PgPool, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "rollbook-cli")]
#[command(about = "Rollbook CLI - Administrative tools for Rollbook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake teachers, staff and students
    Seed {
        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "5")]
        teachers: usize,

        /// Number of non-teaching staff to create
        #[arg(long, default_value = "3")]
        staff: usize,

        /// Number of students to create
        #[arg(short = 's', long, default_value = "100")]
        students: usize,
    },
    /// Clear all seeded data (keeps admins)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = init_db_pool().await?;
    run_migrations(&pool).await?;

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed {
            teachers,
            staff,
            students,
        } => seeder::seed_all(&pool, SeedConfig::new(teachers, students).with_staff(staff)).await,
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::new().with_prompt("Display name").interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    create_admin(pool, &name, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   Email: {}", email.trim());
    println!("   Name: {}", name.trim());
    Ok(())
}
