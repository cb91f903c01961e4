use blogsite::{
    config::Config,
    error::Result,
    seed::{self, Fixture, SeedReport},
    storage::{init_db, migrate},
};

fn print_usage_and_exit() -> ! {
    eprintln!("Usage: seed <fixture.toml> [schema.sql]");
    std::process::exit(1);
}

async fn seed(fixture: &str, schema: Option<&str>) -> Result<SeedReport> {
    let config = Config::from_env()?;
    let db = init_db(&config).await?;

    if let Some(schema) = schema {
        migrate(&db, schema).await?;
        tracing::info!(schema, "schema applied");
    }

    let content = std::fs::read_to_string(fixture)?;
    seed::load(&db, Fixture::from_toml(&content)?).await
}

#[tokio::main]
async fn main() {
    blogsite::init_tracing();

    let mut args = std::env::args().skip(1); // 跳过程序名

    let fixture = args.next().unwrap_or_else(|| {
        eprintln!("Missing <fixture.toml>");
        print_usage_and_exit();
    });
    let schema = args.next();

    if args.next().is_some() {
        eprintln!("Too many arguments provided.");
        print_usage_and_exit();
    }

    match seed(&fixture, schema.as_deref()).await {
        Ok(report) => {
            println!("✅ Seed finished");
            println!(
                "authors: {}, categories: {}, tags: {}, pages: {}, posts: {}, site setup: {}",
                report.authors,
                report.categories,
                report.tags,
                report.pages,
                report.posts,
                report.site_setup
            );
        }
        Err(e) => {
            eprintln!("❌ Seed failed: {e}");
            std::process::exit(1);
        }
    }
}
