//! Interactive storefront shell.
//!
//! A line-oriented front end over [`Session`]: one command per line, state
//! held in the session, and every backend rejection printed as the
//! backend's own message. Type `help` inside the shell for the command
//! list.

use std::io::{self, BufRead, Write};

use mercadito_core::{OrderId, ProductId};
use mercadito_storefront::backend::format_timestamp;
use mercadito_storefront::backend::types::CredentialsRequest;
use mercadito_storefront::catalog::{CategoryFilter, category_label};
use mercadito_storefront::{Config, ConfigError, FlowError, Screen, Session, StoreClient};
use thiserror::Error;

/// Errors that abort the shell (per-command errors are printed instead).
#[derive(Debug, Error)]
pub enum ShopError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("stdin closed: {0}")]
    Io(#[from] io::Error),
}

/// Errors of a single shell command; printed, never fatal.
#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("uso: {0}")]
    Usage(&'static str),
}

const HELP: &str = "\
Comandos:
  list                       ver el catálogo (filtrado)
  search <texto>             filtrar por nombre (vacío para limpiar)
  filter <id|all|none>       filtrar por categoría
  add <id>                   agregar una unidad al carrito
  qty <id> <n>               fijar la cantidad de una línea (0 la quita)
  rm <id>                    quitar una línea del carrito
  cart                       ver el carrito
  login <correo> <clave>     iniciar sesión
  register <correo> <clave> <nombre> [dirección]
  logout                     cerrar sesión (vacía el carrito)
  checkout [dirección]       enviar el pedido (usa tu dirección guardada)
  pay <referencia>           confirmar pago del pedido recién creado
  pay <pedido> <referencia>  confirmar pago de un pedido del historial
  orders                     ver tus pedidos
  refresh                    recargar el catálogo
  back                       volver al catálogo
  help                       esta ayuda
  quit                       salir";

/// Run the shell until `quit` or end of input.
///
/// # Errors
///
/// Returns an error when the backend is unreachable at startup or stdin
/// fails; everything after that is handled inside the loop.
pub async fn run() -> Result<(), ShopError> {
    let config = Config::from_env()?;
    let client = StoreClient::new(&config).map_err(FlowError::from)?;
    let mut session = Session::new(client);

    session.refresh_catalog().await?;
    if let Some(user) = session.restore().await? {
        println!("Sesión restaurada: {}", user.email);
    }
    println!("Mercadito - escribe `help` para ver los comandos");
    print_catalog(&session).await;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        prompt(&session)?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        if command == "quit" {
            break;
        }
        if let Err(e) = dispatch(&mut session, command, &args).await {
            println!("Error: {e}");
        }
    }
    Ok(())
}

fn prompt(session: &Session) -> Result<(), io::Error> {
    let who = session.user().map_or("anónimo", |u| u.email.as_str());
    let screen = match session.screen() {
        Screen::Catalog => "catálogo",
        Screen::Confirmation { .. } => "confirmación",
        Screen::History => "pedidos",
    };
    print!(
        "[{who} | {screen} | carrito: {} línea(s)] > ",
        session.cart().len()
    );
    io::stdout().flush()
}

async fn dispatch(session: &mut Session, command: &str, args: &[&str]) -> Result<(), CommandError> {
    match command {
        "help" => println!("{HELP}"),
        "list" => print_catalog(session).await,
        "search" => {
            session.filter_mut().search = args.join(" ");
            print_catalog(session).await;
        }
        "filter" => {
            session.filter_mut().category = match args.first().copied() {
                None | Some("all") => CategoryFilter::All,
                Some("none") => CategoryFilter::Uncategorized,
                Some(raw) => CategoryFilter::Only(parse_id(raw)?),
            };
            print_catalog(session).await;
        }
        "add" => {
            let id: ProductId = parse_id(args.first().copied().unwrap_or_default())?;
            session.add_to_cart(id)?;
            println!("Agregado. Total: ${}", session.cart().total());
        }
        "qty" => {
            let id: ProductId = parse_id(args.first().copied().unwrap_or_default())?;
            let quantity = args
                .get(1)
                .and_then(|raw| raw.parse().ok())
                .ok_or(CommandError::Usage("qty <id> <n>"))?;
            session.set_cart_quantity(id, quantity)?;
            print_cart(session);
        }
        "rm" => {
            let id: ProductId = parse_id(args.first().copied().unwrap_or_default())?;
            session.remove_from_cart(id);
            print_cart(session);
        }
        "cart" => print_cart(session),
        "login" => {
            let [email, password] = args else {
                return Err(CommandError::Usage("login <correo> <clave>"));
            };
            let user = session.login(email, password).await?;
            println!(
                "Hola, {}",
                user.display_name.as_deref().unwrap_or(&user.email)
            );
        }
        "register" => {
            let [email, password, name, address @ ..] = args else {
                return Err(CommandError::Usage(
                    "register <correo> <clave> <nombre> [dirección]",
                ));
            };
            let request = CredentialsRequest {
                email: (*email).to_owned(),
                password: (*password).to_owned(),
                display_name: Some((*name).to_owned()),
                default_address: (!address.is_empty()).then(|| address.join(" ")),
            };
            let user = session.register(&request).await?;
            println!("Cuenta creada: {}", user.email);
        }
        "logout" => {
            session.logout().await?;
            println!("Sesión cerrada.");
        }
        "checkout" => {
            let address = if args.is_empty() {
                session
                    .user()
                    .and_then(|u| u.default_address.clone())
                    .unwrap_or_default()
            } else {
                args.join(" ")
            };
            let created = session.submit_order(&address).await?;
            println!(
                "Pedido {} creado por ${}. Realiza el pago móvil y confirma con `pay <referencia>`.",
                created.id, created.total
            );
        }
        "pay" => {
            let (order_id, reference): (OrderId, &str) = match (args, session.screen()) {
                ([reference], Screen::Confirmation { order_id, .. }) => (order_id, *reference),
                ([raw_id, reference], _) => (parse_id(raw_id)?, *reference),
                _ => return Err(CommandError::Usage("pay [<pedido>] <referencia>")),
            };
            let status = session.confirm_payment(order_id, reference).await?;
            println!("Pedido {order_id}: {status}");
        }
        "orders" => print_history(session).await?,
        "refresh" => {
            session.refresh_catalog().await?;
            print_catalog(session).await;
        }
        "back" => session.show_catalog(),
        other => println!("Comando desconocido: {other} (escribe `help`)"),
    }
    Ok(())
}

fn parse_id<T: std::str::FromStr>(raw: &str) -> Result<T, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::Usage("se esperaba un id numérico"))
}

async fn print_catalog(session: &Session) {
    let rate = session.client().exchange_rate().await.ok();

    println!(
        "{:>5}  {:<30} {:>9} {:>12} {:>6}  {}",
        "ID", "Nombre", "USD", "Bs", "Stock", "Categoría"
    );
    for product in session.visible_products() {
        let local = rate.map_or_else(String::new, |r| format!("{:.2}", r.convert(product.price)));
        println!(
            "{:>5}  {:<30} {:>9} {:>12} {:>6}  {}",
            product.id,
            product.name,
            product.price,
            local,
            if product.in_stock() {
                product.stock.to_string()
            } else {
                "agotado".to_owned()
            },
            category_label(product),
        );
    }
}

fn print_cart(session: &Session) {
    if session.cart().is_empty() {
        println!("El carrito está vacío.");
        return;
    }
    for line in session.cart().lines() {
        println!(
            "{:>3} × {:<30} ${:>8} = ${}",
            line.quantity,
            line.name,
            line.price,
            line.subtotal()
        );
    }
    println!("Total: ${}", session.cart().total());
}

async fn print_history(session: &mut Session) -> Result<(), CommandError> {
    let orders = session.load_history().await?;
    if orders.is_empty() {
        println!("Todavía no tienes pedidos.");
        return Ok(());
    }
    for order in &orders {
        println!(
            "Pedido {} | {} | ${} | creado {}",
            order.id,
            order.status,
            order.total,
            format_timestamp(order.created_at)
        );
        for line in &order.items {
            println!("    {:>3} × {} (${})", line.quantity, line.name, line.price);
        }
        if let Some(reference) = &order.payment_reference {
            println!("    referencia de pago: {reference}");
        }
        if let Some(reason) = &order.rejection_reason {
            println!("    motivo de rechazo: {reason}");
        }
        if order.status.accepts_payment_reference() {
            println!(
                "    puedes (re)enviar una referencia con `pay {} <referencia>`",
                order.id
            );
        }
    }
    Ok(())
}
