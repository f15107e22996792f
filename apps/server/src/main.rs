use anyhow::Context;
use clap::{Parser, Subcommand};
use escriba_api::{build_router, AppState};
use escriba_backend_runtime::{telemetry, BackendServices};
use escriba_config::load as load_config;
use escriba_orchestrator::{format_reply, Attachment, ChatTurn, PendingAttachment, PDF_MIME_TYPE};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "escriba-backend")]
#[command(about = "Escriba backend (HTTP server by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Start an interactive chat console
    Console,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Console => run_console().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting Escriba backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = AppState::new(services.authenticator.clone(), services.scribe.clone());
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(escriba_backend_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn run_console() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    println!("Consola interactiva de El Escriba");
    println!("Comandos: /registro <usuario> <clave>, /entrar <usuario> <clave>,");
    println!("          /adjuntar <ruta.pdf>, /ayuda, /salir");
    println!("Cualquier otra línea se envía como mensaje al asistente.");
    println!("---");

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    // Client-side transient state: the logged-in name and the single
    // pending attachment slot. Single writer: this loop.
    let mut current_user: Option<String> = None;
    let mut pending = PendingAttachment::default();

    loop {
        print!("> ");
        std::io::Write::flush(&mut std::io::stdout())?;

        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix('/') {
            let mut words = command.split_whitespace();
            match words.next().unwrap_or("") {
                "salir" | "q" => {
                    // Logout clears the pending attachment with the session
                    pending.clear();
                    println!("¡Hasta pronto!");
                    break;
                }
                "ayuda" | "h" => {
                    println!("  /registro <usuario> <clave>  - crear una cuenta");
                    println!("  /entrar <usuario> <clave>    - iniciar sesión");
                    println!("  /adjuntar <ruta.pdf>         - preparar un PDF para el próximo mensaje");
                    println!("  /salir                       - cerrar sesión y salir");
                }
                "registro" => {
                    let (Some(username), Some(password)) = (words.next(), words.next()) else {
                        println!("Uso: /registro <usuario> <clave>");
                        continue;
                    };
                    match services.authenticator.register(username, password).await {
                        Ok(user) => println!("Cuenta creada: {}", user.username),
                        Err(err) => println!("Error: {err}"),
                    }
                }
                "entrar" => {
                    let (Some(username), Some(password)) = (words.next(), words.next()) else {
                        println!("Uso: /entrar <usuario> <clave>");
                        continue;
                    };
                    match services.authenticator.login(username, password).await {
                        Ok(user) => {
                            println!("Bienvenido, {}", user.username);
                            current_user = Some(user.username);
                        }
                        Err(err) => println!("Error: {err}"),
                    }
                }
                "adjuntar" => {
                    let Some(path) = words.next() else {
                        println!("Uso: /adjuntar <ruta.pdf>");
                        continue;
                    };
                    match read_pdf_attachment(path).await {
                        Ok(attachment) => {
                            println!("📄 Archivo listo: {}", attachment.name);
                            pending.select(attachment);
                        }
                        Err(err) => println!("{err}"),
                    }
                }
                other => {
                    println!("Comando desconocido: /{other}");
                    println!("Escribe /ayuda para ver los comandos");
                }
            }
            continue;
        }

        if current_user.is_none() {
            println!("Inicia sesión primero con /entrar o crea una cuenta con /registro");
            continue;
        }

        // One turn: message text plus whatever attachment is pending. The
        // slot is taken before the call so a failed turn is not resent with
        // the same document.
        let turn = ChatTurn {
            message: input.to_string(),
            attachment: pending.take(),
        };

        println!("Analizando pergaminos... ⏳");
        match services.scribe.respond(turn).await {
            Ok(reply) => println!("{}", format_reply(&reply)),
            Err(_) => {
                println!("Error: La pluma se ha roto. Verifica tu conexión o intenta de nuevo.")
            }
        }
    }

    Ok(())
}

async fn read_pdf_attachment(path: &str) -> Result<Attachment, String> {
    let mime_type = if path.to_lowercase().ends_with(".pdf") {
        PDF_MIME_TYPE
    } else {
        "application/octet-stream"
    };

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| format!("No se pudo leer {path}: {err}"))?;

    let name = std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    Attachment::pdf_from_bytes(&name, mime_type, &bytes)
        .map_err(|_| "Por el momento, El Escriba solo lee archivos PDF.".to_string())
}
