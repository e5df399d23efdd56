//! Demo: a small blog admin mounted at `ADMIN_PATH` (default `/admin`).
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Needs `ADMIN_USERNAME`, `ADMIN_PASSWORD` and a reachable `DATABASE_URL` (a `.env` file works).

use architect_admin::{Admin, AdminConfig, AdminModel, NameTransform};
use axum::{response::Redirect, routing::get};
use tokio::net::TcpListener;

#[allow(dead_code)]
#[derive(AdminModel)]
#[admin(table = "authors")]
struct Author {
    #[admin("list,required")]
    name: String,
    #[admin("list,help=Shown on the about page")]
    email: String,
}

#[allow(dead_code)]
#[derive(AdminModel)]
#[admin(table = "posts")]
struct Post {
    #[admin("label=Headline,list,required,maxlength=120")]
    title: String,
    #[admin("textarea")]
    body: String,
    #[admin("label=Author")]
    author: Box<Author>,
    #[admin("list,min=0")]
    views: i64,
    #[admin("min=0,max=5,step=0.5")]
    rating: Option<f64>,
    #[admin("label=Published,list,format=%Y-%m-%d")]
    published_at: chrono::NaiveDateTime,
    #[admin("Field=url,schemes=https")]
    source: String,
    draft: bool,
    #[admin = "-"]
    cached_html: String,
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS authors (id BIGSERIAL PRIMARY KEY, name TEXT NOT NULL, email TEXT)",
    "CREATE TABLE IF NOT EXISTS posts (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        body TEXT,
        author_id BIGINT REFERENCES authors(id),
        views BIGINT,
        rating DOUBLE PRECISION,
        published_at TIMESTAMP,
        source TEXT,
        draft BOOLEAN
    )",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("architect_admin=info")),
        )
        .init();

    let config = AdminConfig::from_env()?.with_name_transform(NameTransform::snake_case());
    let admin = Admin::setup(config)?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(admin.pool()).await?;
    }

    let blog = admin.group("Blog");
    blog.register_model(Author {
        name: String::new(),
        email: String::new(),
    })?;
    blog.register_model(Post {
        title: String::new(),
        body: String::new(),
        author: Box::new(Author {
            name: String::new(),
            email: String::new(),
        }),
        views: 0,
        rating: None,
        published_at: chrono::NaiveDateTime::MIN,
        source: String::new(),
        draft: false,
        cached_html: String::new(),
    })?;

    let mut app = admin.router();
    if !admin.root_path().is_empty() {
        let index = admin.index_url();
        app = app.route("/", get(move || async move { Redirect::temporary(&index) }));
    }

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
