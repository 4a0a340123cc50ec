use std::net::TcpListener;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use reqwest::{Client, Method, Response};

use serde::Serialize;

use sqlx::PgPool;

use tempfile::TempDir;

use uuid::Uuid;

use quill::app;
use quill::domain::{PostStatus, Slug};
use quill::model::{CategoryForm, NewTheme, PostForm};
use quill::repo::{CategoryRepo, NewUser, PostRepo, ThemeRepo, UsersRepo};
use quill::settings::MediaSettings;
use quill::telemetry::{create_subscriber, set_subscriber};

lazy_static::lazy_static! {
    static ref TRACING: () = {
        let filter = "info".to_string();
        // Logs are only shown with `TEST_LOG` set
        if std::env::var("TEST_LOG").is_ok() {
            let subscriber = create_subscriber(filter, std::io::stdout);
            set_subscriber(subscriber).expect("Failed to set test subscriber");
        } else {
            let subscriber = create_subscriber(filter, std::io::sink);
            set_subscriber(subscriber).expect("Failed to set test subscriber");
        }
    };
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub struct TestApp {
    addr: String,

    pub client: Client,
    pub pool: PgPool,
    pub media: TempDir,
    pub admin: TestUser,
}

impl TestApp {
    pub async fn spawn(pool: &PgPool) -> Self {
        lazy_static::initialize(&TRACING);

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();
        let addr = format!("http://127.0.0.1:{}", port);

        let media = tempfile::tempdir().expect("Failed to create media directory");
        let settings = MediaSettings::new(media.path().to_path_buf(), "/media/", vec![]);

        let server =
            app::run(listener, pool.clone(), settings).expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let admin = TestUser::register(pool, "admin@test.com", "correct horse battery").await;

        Self {
            addr,
            client: Client::new(),
            pool: pool.clone(),
            media,
            admin,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", &self.addr, path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, self.url(path))
    }

    pub fn authorized_request(
        &self,
        method: Method,
        path: &str,
        credentials: Option<&Credentials>,
    ) -> reqwest::RequestBuilder {
        let req = self.request(method, path);
        if let Some(creds) = credentials {
            req.basic_auth(creds.email.clone(), Some(creds.password.clone()))
        } else {
            req
        }
    }

    /// Request against the admin API as the registered administrator
    pub fn admin_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.authorized_request(method, path, Some(&self.admin.credentials()))
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn get(&self, path: &str) -> reqwest::Result<Response> {
        self.request(Method::GET, path).send().await
    }

    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        let res = self.get(path).await.expect("Failed to execute request");
        assert!(
            res.status().is_success(),
            "GET {} returned {}",
            path,
            res.status()
        );
        res.json().await.expect("Response is not JSON")
    }

    pub async fn subscribe<T: Serialize>(&self, body: &T) -> reqwest::Result<Response> {
        self.request(Method::POST, "api/v1/subscribe/")
            .json(body)
            .send()
            .await
    }

    pub async fn create_category(&self, name: &str) -> i64 {
        CategoryRepo::insert(
            &self.pool,
            &CategoryForm {
                name: name.into(),
                slug: Slug::derive(name).expect("Failed to derive category slug"),
                description: format!("All about {}", name),
            },
        )
        .await
        .expect("Failed to insert category")
    }

    pub async fn create_post(&self, post: TestPost) -> i64 {
        let form = PostForm {
            slug: Slug::derive(&post.title).expect("Failed to derive post slug"),
            title: post.title,
            content: post.content,
            excerpt: String::new(),
            featured_image: post.featured_image,
            side_image_1: None,
            side_image_2: None,
            status: post.status,
            is_featured: post.is_featured,
            published_at: post.published_at,
            categories: post.categories,
            tags: post.tags,
        };

        let mut conn = self.pool.acquire().await.expect("Failed to acquire connection");
        PostRepo::insert(&mut conn, &form)
            .await
            .expect("Failed to insert post")
    }

    pub async fn create_theme(&self, name: &str, active: bool) -> i64 {
        let mut tx = self.pool.begin().await.expect("Failed to begin transaction");
        let id = ThemeRepo::insert(
            &mut tx,
            &NewTheme {
                name: name.into(),
                title: "Blog Admin".into(),
                active,
            },
        )
        .await
        .expect("Failed to insert theme");
        tx.commit().await.expect("Failed to commit theme");
        id
    }

    /// Write a solid-colored image under the media root
    pub fn write_image(&self, name: &str) -> std::path::PathBuf {
        let path = self.media.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create media subdirectory");
        }
        image::RgbImage::from_pixel(40, 30, image::Rgb([180, 40, 90]))
            .save(&path)
            .expect("Failed to write test image");
        path
    }

    pub fn media_file_exists(&self, name: &str) -> bool {
        Path::new(self.media.path()).join(name).is_file()
    }
}

/// Post fixture with sensible defaults
#[derive(Debug, Clone)]
pub struct TestPost {
    pub title: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub is_featured: bool,
    pub published_at: DateTime<Utc>,
    pub categories: Vec<i64>,
    pub tags: Vec<String>,
}

impl TestPost {
    pub fn published(title: &str) -> Self {
        Self {
            title: title.into(),
            content: format!("The body of {}", title),
            featured_image: None,
            status: PostStatus::Published,
            is_featured: false,
            published_at: Utc::now() - Duration::hours(1),
            categories: vec![],
            tags: vec![],
        }
    }

    pub fn draft(title: &str) -> Self {
        Self {
            status: PostStatus::Draft,
            ..Self::published(title)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

impl TestUser {
    pub async fn register(pool: &PgPool, email: &str, password: &str) -> Self {
        use argon2::password_hash::SaltString;
        use argon2::{Argon2, PasswordHasher};

        let salt = SaltString::generate(&mut rand::thread_rng());

        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("Failed to hash user password")
            .to_string();

        let new_user = NewUser {
            email: email.parse().expect("Failed to parse email address"),
            password_hash,
        };

        let id = UsersRepo::insert(pool, &new_user)
            .await
            .expect("Failed to insert test user");

        Self {
            id,
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}
