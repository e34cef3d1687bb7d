use std::path::PathBuf;
use std::time::Duration;
use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use http::Method;
use restverb::{Client, Request, RequestOptions, Response};
use tracing::Level;

#[derive(Parser)]
#[command(name = "restverb")]
#[command(about = "Send one REST request: GET, HEAD, DELETE, PUT or POST")]
#[command(version)]
struct Cli {
    /// HTTP verb to use
    #[arg(value_name = "VERB")]
    verb: String,

    /// URL to request
    #[arg(value_name = "URL")]
    url: String,

    /// Request headers (format: "Name: Value")
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request body
    #[arg(short = 'd', long)]
    data: Option<String>,

    /// Basic-auth user
    #[arg(short, long)]
    user: Option<String>,

    /// Basic-auth password
    #[arg(short, long)]
    password: Option<String>,

    /// Verify the server certificate
    #[arg(long)]
    tls_verify: Option<bool>,

    /// CA bundle used to verify the server
    #[arg(long)]
    ca_file: Option<PathBuf>,

    /// PEM file holding the client key and certificate
    #[arg(long)]
    cert_file: Option<PathBuf>,

    /// Extra request options (format: key=value)
    #[arg(short = 'o', long = "option")]
    options: Vec<String>,

    /// JSON file of request options, applied before the flags above
    #[arg(long)]
    options_file: Option<PathBuf>,

    /// Timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Show response headers
    #[arg(long)]
    show_headers: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Log request preparation to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn request_options(&self) -> anyhow::Result<RequestOptions> {
        let mut options = match &self.options_file {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                RequestOptions::from_json(&json)?
            }
            None => RequestOptions::new(),
        };

        for option in &self.options {
            let (key, value) = option
                .split_once('=')
                .with_context(|| format!("option {:?} is not key=value", option))?;
            options.set(key.trim(), value.trim())?;
        }
        if let Some(verify) = self.tls_verify {
            options = options.tls_verify(verify);
        }
        if let Some(path) = &self.ca_file {
            options = options.tls_ca_file(path);
        }
        if let Some(path) = &self.cert_file {
            options = options.tls_key_and_certificate_file(path);
        }
        if let Some(user) = &self.user {
            options = options.basic_auth(user, self.password.as_deref());
        }
        Ok(options)
    }

    fn request(&self) -> anyhow::Result<Request> {
        // Any token is accepted here; the client decides which verbs it supports.
        let method = Method::from_bytes(self.verb.to_ascii_uppercase().as_bytes())
            .with_context(|| format!("{:?} is not an HTTP method", self.verb))?;
        let mut request = Request::new(method, self.url.parse()?)
            .with_options(self.request_options()?);

        for header in &self.headers {
            let (name, value) = header
                .split_once(':')
                .with_context(|| format!("header {:?} is not Name: Value", header))?;
            request = request.header(name.trim(), value.trim())?;
        }
        if let Some(data) = &self.data {
            request = request.with_body(data.as_bytes());
        }
        Ok(request)
    }
}

fn print_text(response: &Response, show_headers: bool) {
    let status = response.status();
    let line = format!("{}", status);
    if status.is_success() {
        eprintln!("{}", line.green());
    } else if status.is_client_error() || status.is_server_error() {
        eprintln!("{}", line.red());
    } else {
        eprintln!("{}", line.yellow());
    }

    if show_headers {
        for (name, value) in response.headers() {
            println!("{}: {}", name.as_str().cyan(), value.to_str().unwrap_or(""));
        }
        println!();
    }
    println!("{}", response.text());
}

fn print_json(response: &Response, show_headers: bool) -> anyhow::Result<()> {
    let mut headers = serde_json::Map::new();
    if show_headers {
        for name in response.headers().keys() {
            headers.insert(
                name.to_string(),
                serde_json::json!(response.header_values(name.as_str())),
            );
        }
    }

    let json_response = serde_json::json!({
        "status": response.status().as_u16(),
        "headers": headers,
        "body": response.text(),
    });
    println!("{}", serde_json::to_string_pretty(&json_response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let mut client_builder = Client::builder();
    if let Some(timeout) = cli.timeout {
        client_builder = client_builder.timeout(Duration::from_secs(timeout));
    }
    let client = client_builder.build();

    let response = client.execute(cli.request()?).await?;

    match cli.format {
        OutputFormat::Text => print_text(&response, cli.show_headers),
        OutputFormat::Json => print_json(&response, cli.show_headers)?,
    }

    Ok(())
}
