use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use fintrack::{Category, Transaction, TransactionType, UserId, create_transaction, initialize_db};

/// A utility for creating a test database for the REST API server of fintrack.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user that owns the demo transactions.
    #[arg(long, short, default_value_t = 1)]
    user_id: i64,
}

/// Amounts are in cents.
const MONTHLY_TRANSACTIONS: [(i64, TransactionType, Category, &str); 8] = [
    (520_000, TransactionType::Income, Category::Salary, "Monthly salary"),
    (180_000, TransactionType::Expense, Category::Rent, "Rent"),
    (42_550, TransactionType::Expense, Category::Groceries, "Weekly shops"),
    (18_990, TransactionType::Expense, Category::Utilities, "Power and internet"),
    (12_300, TransactionType::Expense, Category::Dining, "Eating out"),
    (9_500, TransactionType::Expense, Category::Transportation, "Bus pass"),
    (6_999, TransactionType::Expense, Category::Entertainment, "Cinema and streaming"),
    (25_000, TransactionType::Income, Category::Investment, "Dividends"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let user_id = UserId::new(args.user_id)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating demo transactions for user {user_id}...");

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;
    for month in 0..6 {
        let date = today - Duration::days(30 * month);

        for (cents, transaction_type, category, description) in MONTHLY_TRANSACTIONS {
            // Vary the amounts a little from month to month.
            let amount = Decimal::new(cents + month * 1_234, 2);
            create_transaction(
                Transaction::build(
                    user_id,
                    amount,
                    transaction_type,
                    category,
                    date,
                    description,
                ),
                &conn,
            )?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}
