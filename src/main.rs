use std::fmt::Display;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use yesod::models::{decode_url, format_hyperlink};
use yesod::normalizer::{strip_niqqud, transliterate, website_search_text};
use yesod::{
    AudioEntryUpdate, AudioId, CatalogError, CatalogStore, Config, Database, LessonState,
    ListItem, MembershipManager, NewAudioEntry, SearchOrchestrator, WebpageId,
    ensure_database_directory,
};

/// yesod - Hebrew vocabulary catalog with audio, lessons and categories
#[derive(Parser)]
#[command(name = "yesod")]
#[command(about = "A Hebrew vocabulary catalog with audio, lessons, categories and webpages")]
#[command(version)]
struct Cli {
    /// Catalog database file (overrides YESOD_DB)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Log every SQL statement to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Add an audio entry
    Add(AddCommand),
    /// Edit the text or audio file of an entry
    Update(UpdateCommand),
    /// Delete an entry with its links and category memberships
    Delete { id: AudioId },
    /// Show one entry in full
    Show(ShowCommand),
    /// List every entry
    List,
    /// Search English, Hebrew and unvocalized Hebrew text
    Search { text: String },
    /// List lessons in book order
    Lessons,
    /// Assign, clear or list lessons
    #[command(subcommand)]
    Lesson(LessonCommand),
    /// List categories
    Categories,
    /// Manage category membership
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Manage saved webpages
    #[command(subcommand)]
    Webpage(WebpageCommand),
    /// Link an entry to a webpage
    Link { audio_id: AudioId, url_id: WebpageId },
    /// Remove a link between an entry and a webpage
    Unlink { audio_id: AudioId, url_id: WebpageId },
    /// Show what is linked to an entry or a webpage
    #[command(subcommand)]
    Linked(LinkedCommand),
    #[command(flatten)]
    Text(TextCommand),
}

/// Text tools that never open the catalog
#[derive(Subcommand)]
enum TextCommand {
    /// Print an HTML anchor for a topic and URL
    Hyperlink { topic: String, url: String },
    /// Decode percent-encoded characters in a URL
    DecodeUrl { url: String },
    /// Map typed Latin letters to Hebrew
    Translit { text: String },
    /// Strip niqqud, or prepare text for a dictionary lookup
    Normalize {
        text: String,
        /// Also strip gender markers, plurals and punctuation
        #[arg(long)]
        website: bool,
    },
}

/// Add an audio entry
#[derive(Args)]
struct AddCommand {
    /// English gloss
    english: String,
    /// Hebrew text, with or without niqqud
    hebrew: String,
    /// Audio file name in the media directory
    #[arg(short, long, value_name = "FILE")]
    audio: Option<String>,
    /// Lesson name, created if new
    #[arg(short, long, value_name = "NAME")]
    lesson: Option<String>,
}

/// Edit an audio entry; omitted fields keep their value
#[derive(Args)]
struct UpdateCommand {
    id: AudioId,
    #[arg(long)]
    english: Option<String>,
    #[arg(long)]
    hebrew: Option<String>,
    #[arg(long, value_name = "FILE")]
    audio: Option<String>,
}

#[derive(Args)]
struct ShowCommand {
    id: AudioId,
    /// Report membership in this category
    #[arg(short, long, value_name = "NAME")]
    category: Option<String>,
}

#[derive(Subcommand)]
enum LessonCommand {
    /// Assign an entry to a lesson
    Set { id: AudioId, name: String },
    /// Remove an entry's lesson
    Clear { id: AudioId },
    /// List the entries of a lesson
    Members { name: String },
}

#[derive(Subcommand)]
enum CategoryCommand {
    /// Add an entry to a category, creating the category if new
    Add { id: AudioId, name: String },
    /// Remove an entry from a category
    Remove { id: AudioId, name: String },
    /// Tell whether an entry belongs to a category
    Check { id: AudioId, name: String },
    /// List the entries of a category
    Members { name: String },
}

#[derive(Subcommand)]
enum WebpageCommand {
    /// Save a webpage
    Add { topic: String, url: String },
    /// Edit a webpage; omitted fields keep their value
    Update {
        id: WebpageId,
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
    /// Delete a webpage and its links
    Delete { id: WebpageId },
    /// List webpages
    List,
    /// Search webpage topics
    Search { text: String },
    /// Show one webpage
    Show { id: WebpageId },
}

#[derive(Subcommand)]
enum LinkedCommand {
    /// Webpages linked to an entry
    Audio { id: AudioId },
    /// Entries linked to a webpage
    Webpage { id: WebpageId },
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    if let Err(e) = run(cli) {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "yesod=debug" } else { "yesod=info" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(default),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

/// Determines if an error is a user error (vs internal error).
///
/// Validation failures and unknown ids are user errors; store and I/O
/// failures are internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<CatalogError>()
        .is_some_and(CatalogError::is_user_error)
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Text(cmd) = &cli.command {
        return execute_text(cmd);
    }

    let config = Config::from_env()?;
    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path.clone());
    ensure_database_directory(&db_path)?;
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    execute(cli.command, &config, CatalogStore::new(db))
}

/// Executes a catalog command against an opened store.
///
/// Separated from `run` so the command logic works with any database.
fn execute(command: Commands, config: &Config, store: CatalogStore) -> Result<()> {
    let membership = MembershipManager::new(&store);
    let search = SearchOrchestrator::new(&store);

    match command {
        Commands::Add(cmd) => {
            let mut entry = NewAudioEntry::new(cmd.english, cmd.hebrew);
            entry.audio_file = cmd.audio;
            entry.lesson = cmd.lesson;
            let id = store.create_audio_entry(&entry)?;
            println!("Audio entry created (id: {id})");
        }
        Commands::Update(cmd) => {
            let current = store.get_audio_detail(cmd.id)?;
            let mut update = AudioEntryUpdate::from(&current);
            if let Some(english) = cmd.english {
                update.english = english;
            }
            if let Some(hebrew) = cmd.hebrew {
                update.hebrew = hebrew;
            }
            if let Some(audio) = cmd.audio {
                update.audio_file = audio;
            }
            store.update_audio_entry(cmd.id, &update)?;
            println!("Audio entry {} updated", cmd.id);
        }
        Commands::Delete { id } => {
            store.delete_audio_entry(id)?;
            println!("Audio entry {id} deleted");
        }
        Commands::Show(cmd) => {
            let entry = store.get_audio_detail(cmd.id)?;
            let state = membership.display_state(cmd.id, cmd.category.as_deref())?;

            println!("id:       {}", entry.id);
            println!("english:  {}", entry.english);
            println!("hebrew:   {}", entry.hebrew);
            println!("no niqqud: {}", entry.hebrew_no_niqqud);
            match config.audio_path(&entry.audio_file) {
                Some(path) => println!("audio:    {}", path.display()),
                None => println!("audio:    {}", entry.audio_file),
            }
            match &state.lesson {
                LessonState::HasLesson(lesson) => println!("lesson:   {}", lesson.name()),
                LessonState::NoLesson => println!("lesson:   (none)"),
            }
            if let Some(category) = &cmd.category {
                println!("category: {category} ({:?})", state.category);
            }
            for page in store.webpages_for_audio(entry.id)? {
                println!("webpage:  {page}");
            }
        }
        Commands::List => print_items(&store.list_audio()?, "No audio entries"),
        Commands::Search { text } => {
            print_items(&search.search_audio(&text)?, "No matching entries")
        }
        Commands::Lessons => {
            let lessons = store.list_lessons()?;
            if lessons.is_empty() {
                println!("No lessons");
            }
            for lesson in lessons {
                println!("{}", ListItem::new(lesson.name(), lesson.id()));
            }
        }
        Commands::Lesson(cmd) => execute_lesson(cmd, &store, &membership)?,
        Commands::Categories => {
            let categories = store.list_categories()?;
            if categories.is_empty() {
                println!("No categories");
            }
            for category in categories {
                println!("{}", category.name());
            }
        }
        Commands::Category(cmd) => execute_category(cmd, &membership)?,
        Commands::Webpage(cmd) => execute_webpage(cmd, &store, &search)?,
        Commands::Link { audio_id, url_id } => {
            let change = store.link_audio_webpage(audio_id, url_id)?;
            println!("Audio entry {audio_id} and webpage {url_id}: {change}");
        }
        Commands::Unlink { audio_id, url_id } => {
            let removal = store.unlink_audio_webpage(audio_id, url_id)?;
            println!("Audio entry {audio_id} and webpage {url_id}: {removal}");
        }
        Commands::Linked(LinkedCommand::Audio { id }) => {
            print_items(&search.webpages_for_audio(id)?, "No linked webpages")
        }
        Commands::Linked(LinkedCommand::Webpage { id }) => {
            print_items(&search.audio_for_webpage(id)?, "No linked audio entries")
        }
        Commands::Text(cmd) => execute_text(&cmd)?,
    }

    Ok(())
}

fn execute_text(cmd: &TextCommand) -> Result<()> {
    match cmd {
        TextCommand::Hyperlink { topic, url } => println!("{}", format_hyperlink(topic, url)?),
        TextCommand::DecodeUrl { url } => println!("{}", decode_url(url)),
        TextCommand::Translit { text } => println!("{}", transliterate(text)),
        TextCommand::Normalize { text, website } => {
            if *website {
                println!("{}", website_search_text(text));
            } else {
                println!("{}", strip_niqqud(text));
            }
        }
    }
    Ok(())
}

fn execute_lesson(
    cmd: LessonCommand,
    store: &CatalogStore,
    membership: &MembershipManager<'_>,
) -> Result<()> {
    match cmd {
        LessonCommand::Set { id, name } => {
            print_lesson_state(id, &membership.set_lesson(id, &name)?);
        }
        LessonCommand::Clear { id } => {
            print_lesson_state(id, &membership.clear_lesson(id)?);
        }
        LessonCommand::Members { name } => {
            if store.find_lesson(&name)?.is_none() {
                println!("No lesson named {name}");
            } else {
                print_items(&store.list_lesson_members(&name)?, "Lesson has no entries");
            }
        }
    }
    Ok(())
}

fn execute_category(cmd: CategoryCommand, membership: &MembershipManager<'_>) -> Result<()> {
    match cmd {
        CategoryCommand::Add { id, name } => {
            let change = membership.add_to_category(id, &name)?;
            println!("Audio entry {id} in {name}: {change}");
        }
        CategoryCommand::Remove { id, name } => {
            let removal = membership.remove_from_category(id, &name)?;
            println!("Audio entry {id} in {name}: {removal}");
        }
        CategoryCommand::Check { id, name } => {
            if membership.is_member(id, &name)? {
                println!("Audio entry {id} is a member of {name}");
            } else {
                println!("Audio entry {id} is not a member of {name}");
            }
        }
        CategoryCommand::Members { name } => {
            print_items(&membership.list_category_members(&name)?, "Category has no entries")
        }
    }
    Ok(())
}

fn execute_webpage(
    cmd: WebpageCommand,
    store: &CatalogStore,
    search: &SearchOrchestrator<'_>,
) -> Result<()> {
    match cmd {
        WebpageCommand::Add { topic, url } => {
            let id = store.create_webpage(&topic, &url)?;
            println!("Webpage created (id: {id})");
        }
        WebpageCommand::Update { id, topic, url } => {
            let current = store.get_webpage(id)?;
            store.update_webpage(
                id,
                topic.as_deref().unwrap_or(&current.topic),
                url.as_deref().unwrap_or(&current.url),
            )?;
            println!("Webpage {id} updated");
        }
        WebpageCommand::Delete { id } => {
            store.delete_webpage(id)?;
            println!("Webpage {id} deleted");
        }
        WebpageCommand::List => print_items(&store.list_webpages()?, "No webpages"),
        WebpageCommand::Search { text } => {
            print_items(&search.search_webpages(&text)?, "No matching webpages")
        }
        WebpageCommand::Show { id } => {
            let page = store.get_webpage(id)?;
            println!("id:    {}", page.id);
            println!("topic: {}", page.topic);
            println!("url:   {}", decode_url(&page.url));
            println!("html:  {}", page.hyperlink()?);
        }
    }
    Ok(())
}

fn print_lesson_state(id: AudioId, state: &LessonState) {
    match state.lesson() {
        Some(lesson) => println!("Audio entry {id} is in lesson {}", lesson.name()),
        None => println!("Audio entry {id} has no lesson"),
    }
}

fn print_items<I: Display>(items: &[ListItem<I>], empty_message: &str) {
    if items.is_empty() {
        println!("{empty_message}");
    }
    for item in items {
        println!("{item}");
    }
}
