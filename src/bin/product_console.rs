use async_trait::async_trait;
use product_console::{
    clients::product_client::{HttpProductClient, ProductApi},
    console::{self, ConsoleNavigator, ConsoleNotifier},
    controllers::{
        create_controller::{CreateFormController, SubmitOutcome},
        edit_controller::{EditFormController, EditOutcome},
        form_events,
        list_controller::{ListController, UpdateTarget},
        FormEventReceiver, FormEventSender,
    },
    forms::{validation::display_name, FormVariant},
    logging,
    models::product_model::{Product, ProductId},
    notifications::{ConfirmationPrompt, Notification, NotificationSink},
    routes::Route,
    settings::{EditMode, Settings},
};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::{error, info};

type Products = ListController<HttpProductClient>;

/// Line-oriented stdin shared by the command loop and the confirmation prompt.
struct Input {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Input {
    fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// `None` once stdin is closed.
    async fn read_line(&self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        let mut lines = self.lines.lock().await;
        Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
    }

    async fn ask_yes(&self, question: &str) -> bool {
        match self.read_line(&format!("{} [y/N] ", question)).await {
            Ok(Some(answer)) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

struct StdinConfirmation {
    input: Arc<Input>,
}

#[async_trait]
impl ConfirmationPrompt for StdinConfirmation {
    async fn confirm(&self, message: &str) -> bool {
        self.input.ask_yes(message).await
    }
}

enum Command {
    List,
    Show(ProductId),
    Add,
    Edit(ProductId),
    Delete(ProductId),
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let name = words.next()?;
        let id = words.next().map(str::parse::<ProductId>);
        let with_id = |build: fn(ProductId) -> Command| match id {
            Some(Ok(id)) => build(id),
            _ => Command::Invalid(format!("usage: {} <id>", name)),
        };

        Some(match name {
            "list" | "ls" => Command::List,
            "show" => with_id(Command::Show),
            "add" => Command::Add,
            "edit" => with_id(Command::Edit),
            "delete" | "rm" => with_id(Command::Delete),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Invalid(format!("unknown command: {} (try `help`)", other)),
        })
    }
}

struct App {
    api: Arc<HttpProductClient>,
    notifier: Arc<dyn NotificationSink>,
    input: Arc<Input>,
    navigator: Arc<ConsoleNavigator>,
    list: Products,
    events_tx: FormEventSender,
    events_rx: FormEventReceiver,
}

impl App {
    async fn run(&mut self) -> anyhow::Result<()> {
        self.list.load_products().await;
        self.print_list();
        println!("{}", console::HELP);

        while let Some(line) = self.input.read_line("products> ").await? {
            let Some(command) = Command::parse(&line) else {
                continue;
            };

            match command {
                Command::List => self.list.load_products().await,
                Command::Show(id) => self.show(id).await,
                Command::Add => self.add().await?,
                Command::Edit(id) => {
                    if let UpdateTarget::Dialog(_) = self.list.navigate_to_update(id) {
                        if let Some(form) = self.list.edit_form(self.events_tx.clone()) {
                            self.edit(form).await?;
                        }
                    }
                }
                Command::Delete(id) => {
                    self.list.confirm_delete(id).await;
                }
                Command::Help => println!("{}", console::HELP),
                Command::Quit => break,
                Command::Invalid(message) => println!("{}", message),
            }

            if let Some(route) = self.navigator.take_pending() {
                self.open(route).await?;
            }
            self.drain_events().await;

            if command_refreshes(&line) {
                self.print_list();
            }
        }

        info!("Console closed");
        Ok(())
    }

    fn print_list(&self) {
        println!("{}", console::render_products(self.list.products()));
    }

    async fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.list.handle_event(event).await;
        }
    }

    async fn show(&self, id: ProductId) {
        match self.api.get_product(id).await {
            Ok(product) => println!("{}", console::render_product(&product)),
            Err(err) => {
                error!("Failed to fetch product {}: {}", id, err);
                self.notifier
                    .notify(Notification::error("Failed to load product"));
            }
        }
    }

    async fn open(&mut self, route: Route) -> anyhow::Result<()> {
        println!("-- {} ({})", route.title(), route);
        match route {
            Route::List => self.list.load_products().await,
            Route::Add => self.add().await?,
            Route::Edit(id) => {
                if let Some(form) = self.list.load_edit_form(id, self.events_tx.clone()).await {
                    self.edit(form).await?;
                }
            }
        }
        Ok(())
    }

    async fn add(&mut self) -> anyhow::Result<()> {
        self.list.show_add_dialog();
        let mut form = self.list.create_form(self.events_tx.clone());

        loop {
            fill_create_form(&self.input, &mut form).await?;
            match form.submit().await {
                SubmitOutcome::Created(product) => {
                    println!("{}", console::render_product(&product));
                    return Ok(());
                }
                SubmitOutcome::Invalid => {
                    println!("{}", console::render_form_errors(form.form()));
                }
                SubmitOutcome::Failed => {}
            }
            if !self.input.ask_yes("Try again?").await {
                break;
            }
        }

        self.list.hide_add_dialog().await;
        Ok(())
    }

    async fn edit(&mut self, mut form: EditFormController<HttpProductClient>) -> anyhow::Result<()> {
        loop {
            fill_edited_product(&self.input, form.edited_mut()).await?;
            match next_edit_step(&form.submit().await) {
                EditStep::Done => return Ok(()),
                EditStep::Close => break,
                EditStep::Retry => {}
            }
            if !self.input.ask_yes("Try again?").await {
                break;
            }
        }

        self.list.hide_update_dialog().await;
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum EditStep {
    /// The saved event closes the dialog.
    Done,
    Close,
    Retry,
}

fn next_edit_step(outcome: &EditOutcome) -> EditStep {
    match outcome {
        EditOutcome::Updated(_) => EditStep::Done,
        EditOutcome::Skipped => EditStep::Close,
        EditOutcome::Failed => EditStep::Retry,
    }
}

fn command_refreshes(line: &str) -> bool {
    matches!(
        line.split_whitespace().next(),
        Some("list" | "ls" | "add" | "edit" | "delete" | "rm")
    )
}

async fn prompt_value(
    input: &Input,
    label: &str,
    current: &str,
) -> anyhow::Result<Option<String>> {
    let answer = input
        .read_line(&format!("{} [{}]: ", display_name(label), current))
        .await?
        .unwrap_or_default();
    Ok((!answer.is_empty()).then_some(answer))
}

async fn fill_create_form(
    input: &Input,
    form: &mut CreateFormController<HttpProductClient>,
) -> anyhow::Result<()> {
    let names: Vec<&'static str> = form.form().fields().iter().map(|field| field.name()).collect();

    for name in names {
        let current = form.form().value(name)?.to_string();
        if let Some(answer) = prompt_value(input, name, &current).await? {
            form.form_mut().set_input(name, &answer)?;
        }
    }
    Ok(())
}

async fn fill_edited_product(input: &Input, product: &mut Product) -> anyhow::Result<()> {
    if let Some(name) = prompt_value(input, "name", &product.name).await? {
        product.name = name;
    }
    if let Some(description) = prompt_value(input, "description", &product.description).await? {
        product.description = description;
    }
    if let Some(price) = prompt_value(input, "price", &product.price.to_string()).await? {
        match price.parse::<f64>() {
            Ok(price) if price.is_finite() => product.price = price,
            _ => println!("Price must be a number, keeping {}", product.price),
        }
    }
    if let Some(quantity) = product.stock_quantity {
        if let Some(answer) = prompt_value(input, "stockQuantity", &quantity.to_string()).await? {
            match answer.parse() {
                Ok(quantity) => product.stock_quantity = Some(quantity),
                Err(_) => println!("StockQuantity must be a whole number, keeping {}", quantity),
            }
        }
    }
    if let Some(category) = product.category.clone() {
        if let Some(answer) = prompt_value(input, "category", &category).await? {
            product.category = Some(answer);
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    logging::init(&settings.log.level);

    info!("Starting product console against {}", settings.api.base_url);

    let api = Arc::new(HttpProductClient::new(settings.api.base_url.clone())?);
    let notifier: Arc<dyn NotificationSink> = Arc::new(ConsoleNotifier);
    let input = Arc::new(Input::new());
    let prompt = Arc::new(StdinConfirmation {
        input: Arc::clone(&input),
    });
    let navigator = Arc::new(ConsoleNavigator::default());

    let mut list = ListController::new(Arc::clone(&api), Arc::clone(&notifier), prompt)
        .with_form_variant(settings.form.variant);
    if settings.ui.edit_mode == EditMode::Routed {
        list = list.with_navigator(navigator.clone());
    }
    if settings.form.variant == FormVariant::Catalog {
        info!("Using catalog product form");
    }

    let (events_tx, events_rx) = form_events();
    let mut app = App {
        api,
        notifier,
        input,
        navigator,
        list,
        events_tx,
        events_rx,
    };

    app.run().await
}
