use std::fs;
use std::path::PathBuf;

use clap::Parser;
use post_client::PostClient;

const TOKEN_FILE: &str = ".post_token";

#[derive(Parser, Debug)]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    Register {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    ListPosts,
    GetPost {
        id: i64,
    },
    CreatePost {
        #[clap(long)]
        title: String,
        #[clap(long)]
        description: String,
        #[clap(long)]
        image: Option<PathBuf>,
    },
    UpdatePost {
        id: i64,
        #[clap(long)]
        title: String,
        #[clap(long)]
        description: String,
        #[clap(long)]
        image: Option<PathBuf>,
    },
    DeletePost {
        id: i64,
    },
}

fn saved_token() -> Option<String> {
    fs::read_to_string(TOKEN_FILE)
        .ok()
        .map(|t| t.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut client = PostClient::new(&args.server)?.with_token(saved_token());

    match args.command {
        Command::Register {
            name,
            email,
            password,
        } => {
            let token = client.register(&name, &email, &password).await?;
            fs::write(TOKEN_FILE, token)?;
            println!("Successfully registered!");
        }
        Command::Login { email, password } => {
            let token = client.login(&email, &password).await?;
            fs::write(TOKEN_FILE, token)?;
            println!("Successfully logged in!");
        }
        Command::ListPosts => {
            let posts = client.list_posts().await?;
            println!("Posts ({})", posts.len());
            for post in posts {
                println!("- {}", post);
            }
        }
        Command::GetPost { id } => {
            let post = client.get_post(id).await?;
            println!("{}", post);
        }
        Command::CreatePost {
            title,
            description,
            image,
        } => {
            let post = client
                .create_post(&title, &description, image.as_deref())
                .await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::UpdatePost {
            id,
            title,
            description,
            image,
        } => {
            let post = client
                .update_post(id, &title, &description, image.as_deref())
                .await?;
            println!("Post updated: {}", post);
        }
        Command::DeletePost { id } => {
            client.delete_post(id).await?;
            println!("Post deleted!");
        }
    }

    Ok(())
}
