//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Safe to run repeatedly; existing
//! rows are left untouched.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

struct SeedAuthor {
    id: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    date_of_birth: (i32, u32, u32),
    genre: &'static str,
    books: &'static [(&'static str, &'static str, &'static str)],
}

const AUTHORS: &[SeedAuthor] = &[
    SeedAuthor {
        id: "25320c5e-f58a-4b1f-b63a-8ee07a840bdf",
        first_name: "Stephen",
        last_name: "King",
        date_of_birth: (1947, 9, 21),
        genre: "Horror",
        books: &[
            (
                "c7ba6add-09c4-45f8-8dd0-eaca221e5d93",
                "The Shining",
                "The Shining is a horror novel by American author Stephen King.",
            ),
            (
                "a3749477-f823-4124-aa4a-fc9ad5e79cd6",
                "Misery",
                "Misery is a psychological horror novel about a writer held captive by his self-proclaimed number one fan.",
            ),
        ],
    },
    SeedAuthor {
        id: "76053df4-6687-4353-8937-b45556748abe",
        first_name: "George",
        last_name: "Martin",
        date_of_birth: (1948, 9, 20),
        genre: "Fantasy",
        books: &[(
            "447eb762-95e9-4c31-95e1-b20053fbe215",
            "A Game of Thrones",
            "A Game of Thrones is the first novel in A Song of Ice and Fire, a series of fantasy novels.",
        )],
    },
    SeedAuthor {
        id: "412c3012-d891-4f5e-9613-ff7aa63e6bb3",
        first_name: "Neil",
        last_name: "Gaiman",
        date_of_birth: (1960, 11, 10),
        genre: "Fantasy",
        books: &[(
            "9edf91ee-ab77-4521-a402-5f188bc0c577",
            "American Gods",
            "American Gods is a blend of Americana, fantasy, and various strands of ancient and modern mythology.",
        )],
    },
    SeedAuthor {
        id: "578359b7-1967-41d6-8b87-64ab7605587e",
        first_name: "Tom",
        last_name: "Lanoye",
        date_of_birth: (1958, 8, 27),
        genre: "Various",
        books: &[(
            "01457142-358f-495f-aafa-fb23f3a043b3",
            "Speechless",
            "Good-natured and often humorous, Speechless is at times a 'song of curses', as Lanoye describes the conflicts with his beloved mother.",
        )],
    },
    SeedAuthor {
        id: "f74d6899-9ed2-4137-9876-66b070553f8f",
        first_name: "Douglas",
        last_name: "Adams",
        date_of_birth: (1952, 3, 11),
        genre: "Science fiction",
        books: &[(
            "e57b33d8-e11f-4a13-8e39-e7026ecfd62d",
            "The Hitchhiker's Guide to the Galaxy",
            "The Hitchhiker's Guide to the Galaxy is a comedy science fiction series created by Douglas Adams.",
        )],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Librarium Seed Script ===");

    seed_catalog(&pool).await?;

    println!("=== Seed complete! ===");

    Ok(())
}

async fn seed_catalog(pool: &PgPool) -> anyhow::Result<()> {
    for author in AUTHORS {
        let author_id: Uuid = author.id.parse()?;
        let (year, month, day) = author.date_of_birth;
        let dob = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| anyhow::anyhow!("invalid seed date for {}", author.last_name))?;

        sqlx::query(
            "INSERT INTO authors (id, first_name, last_name, date_of_birth, genre)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(author_id)
        .bind(author.first_name)
        .bind(author.last_name)
        .bind(dob)
        .bind(author.genre)
        .execute(pool)
        .await?;

        for (book_id, title, description) in author.books {
            sqlx::query(
                "INSERT INTO books (id, author_id, title, description)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(book_id.parse::<Uuid>()?)
            .bind(author_id)
            .bind(title)
            .bind(description)
            .execute(pool)
            .await?;
        }

        println!(
            "[done] {} {} ({} books)",
            author.first_name,
            author.last_name,
            author.books.len()
        );
    }

    Ok(())
}
