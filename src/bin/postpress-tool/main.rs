use clap::Parser;

use crate::init::init_cmd;
use crate::publish::publish_cmd;

mod init;
mod publish;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Publishes a markdown file as a post
    Publish(PublishArgs),
    /// Writes a sample configuration and the default theme
    Init(InitArgs),
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct PublishArgs {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    /// Markdown file with the post body
    #[arg(short, long)]
    file: String,

    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// Slug used in the published paths. Derived from the title when empty
    #[arg(short, long)]
    slug: Option<String>,

    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long)]
    author: Option<String>,

    /// Comma separated tags
    #[arg(long, default_value = "")]
    tags: String,

    /// Publication date, e.g. "2024-01-02 10:00:00". Defaults to now
    #[arg(short, long)]
    date: Option<String>,

    /// Base address of the render server. Defaults to render.base_url, then to the configured server
    #[arg(long)]
    server: Option<String>,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct InitArgs {
    /// Directory where the configuration and themes are written
    #[arg(short, long)]
    out_dir: String,
}

#[ntex::main]
async fn main() {
    let args = Args::parse();

    let res = match args {
        Args::Publish(args) => publish_cmd(args).await,
        Args::Init(args) => init_cmd(args),
    };

    if let Err(e) = res {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
