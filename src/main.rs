// ============================================================================
// TINYTODO - Terminal To-Do & Habit Tracker
// ============================================================================
//
// MODULE STRUCTURE:
// 1. Imports & Constants        - Dependencies, data file path, decorations
// 2. Logging                    - Rolling file log bootstrap
// 3. Data Structures            - Todo, Habit, Document
// 4. Store                      - JSON persistence and mutation operations
// 5. Menu Commands              - Enumerated menu choices and parsing
// 6. Main Loop                  - Render/prompt/dispatch cycle
// 7. Rendering (Drawing)        - List and menu output
// 8. Parsers & Validators       - Input validation with error messages
//
// Each section is clearly marked with section headers for easy navigation.
// ============================================================================

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use crossterm::style::Stylize;
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{debug, info};

const DATA_FILE: &str = "data.json";
const LOG_DIR: &str = "logs";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

const CAT_ART: &str = r"
  /\_/\
 ( o.o )
  > ^ <
";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:?}");
    }
}

fn run() -> Result<()> {
    // The handle must stay alive so buffered records flush on exit.
    let _logger = match init_logging() {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("logging disabled: {err}");
            None
        }
    };

    info!("tinytodo {} starting", env!("CARGO_PKG_VERSION"));
    let mut store = Store::load(DATA_FILE)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    run_menu(&mut store, &mut input)
}

// ============================================================================
// LOGGING - Rolling file logs; stdout belongs to the menu
// ============================================================================

fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "info" }
}

fn init_logging() -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_str(default_log_level())?
        .log_to_file(FileSpec::default().directory(LOG_DIR).basename("tinytodo"))
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .start()
}

// ============================================================================
// DATA STRUCTURES - Todo, Habit, Document
// ============================================================================

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Todo {
    task: String,
    done: bool,
    #[serde(with = "day_stamp")]
    date_added: NaiveDate,
}

impl Todo {
    fn new(task: String, date_added: NaiveDate) -> Self {
        Self {
            task,
            done: false,
            date_added,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Habit {
    // The on-disk key has always been `habit`.
    #[serde(rename = "habit")]
    name: String,
    completed_days: u32,
}

impl Habit {
    fn new(name: String) -> Self {
        Self {
            name,
            completed_days: 0,
        }
    }
}

/// The full persisted state: active todos, habits, and archived todos.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
struct Document {
    todos: Vec<Todo>,
    habits: Vec<Habit>,
    // Older data files predate archiving and lack this key.
    #[serde(default)]
    archive: Vec<Todo>,
}

/// On-disk dates carry a weekday label ("2024-05-01 Wednesday"). Serialization
/// renders the weekday from the date; parsing cross-checks it.
mod day_stamp {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %A";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn day_stamp_label(date: NaiveDate) -> String {
    date.format(day_stamp::FORMAT).to_string()
}

// ============================================================================
// STORE - JSON persistence and mutation operations
// ============================================================================
//
// The store owns the document and the data-file path; every mutation rewrites
// the whole file. Last write wins; single-process, single-user assumption.

struct Store {
    path: PathBuf,
    doc: Document,
}

impl Store {
    /// Loads the persisted document, or starts fresh when no file exists.
    /// A file that exists but does not parse is a fatal startup error.
    fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Document::default()
        };
        info!(
            "loaded document: {} todos, {} habits, {} archived",
            doc.todos.len(),
            doc.habits.len(),
            doc.archive.len()
        );
        Ok(Self { path, doc })
    }

    fn save(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.doc)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        debug!("document saved to {}", self.path.display());
        Ok(())
    }

    /// Moves every done todo whose creation date is at least one day before
    /// `now` into the archive, preserving relative order on both sides.
    /// Returns how many were moved. Day-granular: time of day never enters
    /// the comparison.
    fn archive_stale_completed(&mut self, now: NaiveDate) -> Result<usize> {
        let is_stale = |todo: &Todo| todo.done && (now - todo.date_added).num_days() >= 1;
        if !self.doc.todos.iter().any(|todo| is_stale(todo)) {
            return Ok(0);
        }
        let (stale, active): (Vec<Todo>, Vec<Todo>) =
            self.doc.todos.drain(..).partition(|todo| is_stale(todo));
        let moved = stale.len();
        self.doc.archive.extend(stale);
        self.doc.todos = active;
        self.save()?;
        info!("archived {moved} completed to-dos");
        Ok(moved)
    }

    fn add_todo(&mut self, task: String, date_added: NaiveDate) -> Result<()> {
        self.doc.todos.push(Todo::new(task, date_added));
        self.save()
    }

    /// Marks the 1-based `number` as done. Returns false when out of range.
    fn mark_done(&mut self, number: usize) -> Result<bool> {
        match number.checked_sub(1).and_then(|i| self.doc.todos.get_mut(i)) {
            Some(todo) => {
                todo.done = true;
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes the 1-based `number`. Returns false when out of range.
    fn delete_todo(&mut self, number: usize) -> Result<bool> {
        match number.checked_sub(1) {
            Some(i) if i < self.doc.todos.len() => {
                self.doc.todos.remove(i);
                self.save()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Clears the active list only when explicitly confirmed.
    fn delete_all_todos(&mut self, confirmed: bool) -> Result<bool> {
        if !confirmed {
            return Ok(false);
        }
        self.doc.todos.clear();
        self.save()?;
        Ok(true)
    }

    fn add_habit(&mut self, name: String) -> Result<()> {
        self.doc.habits.push(Habit::new(name));
        self.save()
    }

    /// Overwrites the day counter of the 1-based `number`; `None` keeps the
    /// current value. Returns false when out of range.
    fn set_habit_days(&mut self, number: usize, new_days: Option<u32>) -> Result<bool> {
        match number.checked_sub(1).and_then(|i| self.doc.habits.get_mut(i)) {
            Some(habit) => {
                if let Some(days) = new_days {
                    habit.completed_days = days;
                }
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_habit(&mut self, number: usize) -> Result<bool> {
        match number.checked_sub(1) {
            Some(i) if i < self.doc.habits.len() => {
                self.doc.habits.remove(i);
                self.save()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn delete_all_habits(&mut self, confirmed: bool) -> Result<bool> {
        if !confirmed {
            return Ok(false);
        }
        self.doc.habits.clear();
        self.save()?;
        Ok(true)
    }
}

// ============================================================================
// MENU COMMANDS - Enumerated menu choices and parsing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    AddTodo,
    MarkTodoDone,
    TodoMaintenance,
    AddHabit,
    CompleteHabit,
    HabitMaintenance,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::AddTodo),
            "2" => Some(Self::MarkTodoDone),
            "3" => Some(Self::TodoMaintenance),
            "4" => Some(Self::AddHabit),
            "5" => Some(Self::CompleteHabit),
            "6" => Some(Self::HabitMaintenance),
            "7" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TodoMaintenanceChoice {
    DeleteOne,
    DeleteAll,
    ArchiveCompleted,
    Back,
}

impl TodoMaintenanceChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::DeleteOne),
            "2" => Some(Self::DeleteAll),
            "3" => Some(Self::ArchiveCompleted),
            "4" => Some(Self::Back),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HabitMaintenanceChoice {
    DeleteOne,
    DeleteAll,
    Back,
}

impl HabitMaintenanceChoice {
    // Numbering continues the main menu's habit block (4-6).
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "4" => Some(Self::DeleteOne),
            "5" => Some(Self::DeleteAll),
            "6" => Some(Self::Back),
            _ => None,
        }
    }
}

// ============================================================================
// MAIN LOOP - Render/prompt/dispatch cycle
// ============================================================================

fn run_menu(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    loop {
        // Archiving runs implicitly before every render.
        if store.archive_stale_completed(today())? > 0 {
            println!("Archived completed to-dos older than 1 day.");
        }

        render_todos(&store.doc);
        render_habits(&store.doc);
        println!("{CAT_ART}");
        render_main_menu();

        let raw = prompt(input, "Choose an option: ")?;
        let Some(choice) = MenuChoice::parse(&raw) else {
            println!("Invalid choice! Please try again.");
            continue;
        };

        match choice {
            MenuChoice::AddTodo => add_todo_flow(store, input)?,
            MenuChoice::MarkTodoDone => mark_todo_done_flow(store, input)?,
            MenuChoice::TodoMaintenance => todo_maintenance_flow(store, input)?,
            MenuChoice::AddHabit => add_habit_flow(store, input)?,
            MenuChoice::CompleteHabit => complete_habit_flow(store, input)?,
            MenuChoice::HabitMaintenance => habit_maintenance_flow(store, input)?,
            MenuChoice::Exit => break,
        }
    }
    info!("exiting on user request");
    Ok(())
}

fn add_todo_flow(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    let task = prompt(input, "Enter the task: ")?;
    store.add_todo(task, today())?;
    println!("Task added!");
    Ok(())
}

fn mark_todo_done_flow(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    if store.doc.todos.is_empty() {
        println!("No to-dos available to mark as done.");
        return Ok(());
    }
    render_todos(&store.doc);
    let raw = prompt(input, "Enter the task number to mark as done: ")?;
    let marked = match parse_item_number(&raw) {
        Some(number) => store.mark_done(number)?,
        None => false,
    };
    if marked {
        println!("Task marked as done!");
    } else {
        println!("Invalid task number!");
    }
    Ok(())
}

fn todo_maintenance_flow(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    if store.doc.todos.is_empty() {
        println!("No to-dos available to delete.");
        return Ok(());
    }
    render_todos(&store.doc);
    render_todo_maintenance_menu();
    let raw = prompt(input, "Choose an option: ")?;
    match TodoMaintenanceChoice::parse(&raw) {
        Some(TodoMaintenanceChoice::DeleteOne) => delete_todo_flow(store, input)?,
        Some(TodoMaintenanceChoice::DeleteAll) => delete_all_todos_flow(store, input)?,
        Some(TodoMaintenanceChoice::ArchiveCompleted) => {
            if store.archive_stale_completed(today())? > 0 {
                println!("Archived completed to-dos older than 1 day.");
            }
        }
        Some(TodoMaintenanceChoice::Back) => {}
        None => println!("Invalid choice! Returning to main menu."),
    }
    Ok(())
}

fn delete_todo_flow(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    let raw = prompt(input, "Enter the task number to delete: ")?;
    let deleted = match parse_item_number(&raw) {
        Some(number) => store.delete_todo(number)?,
        None => false,
    };
    if deleted {
        println!("Task deleted!");
    } else {
        println!("Invalid task number!");
    }
    Ok(())
}

fn delete_all_todos_flow(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    let confirm = prompt(input, "Are you sure you want to delete all to-dos? (y/n): ")?;
    if store.delete_all_todos(confirm.eq_ignore_ascii_case("y"))? {
        println!("All to-dos deleted!");
    } else {
        println!("Deletion canceled.");
    }
    Ok(())
}

fn add_habit_flow(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    let name = prompt(input, "Enter the habit: ")?;
    store.add_habit(name)?;
    println!("Habit added!");
    Ok(())
}

fn complete_habit_flow(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    if store.doc.habits.is_empty() {
        println!("No habits available to mark as completed.");
        return Ok(());
    }
    render_habits(&store.doc);
    let raw = prompt(input, "Enter the habit number to mark as completed: ")?;
    let Some(number) = parse_item_number(&raw) else {
        println!("Invalid habit number!");
        return Ok(());
    };
    let current = number
        .checked_sub(1)
        .and_then(|i| store.doc.habits.get(i))
        .map(|habit| habit.completed_days);
    let Some(current) = current else {
        println!("Invalid habit number!");
        return Ok(());
    };

    println!("Current Days Completed: {current}");
    let raw_days = prompt(
        input,
        "Enter the number of days completed (or leave blank to keep current): ",
    )?;
    let new_days = match parse_day_count(&raw_days) {
        Ok(value) => value,
        Err(warning) => {
            println!("{warning}");
            None
        }
    };
    store.set_habit_days(number, new_days)?;
    println!("Habit updated!");
    Ok(())
}

fn habit_maintenance_flow(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    if store.doc.habits.is_empty() {
        println!("No habits available to delete.");
        return Ok(());
    }
    render_habits(&store.doc);
    render_habit_maintenance_menu();
    let raw = prompt(input, "Choose an option: ")?;
    match HabitMaintenanceChoice::parse(&raw) {
        Some(HabitMaintenanceChoice::DeleteOne) => delete_habit_flow(store, input)?,
        Some(HabitMaintenanceChoice::DeleteAll) => delete_all_habits_flow(store, input)?,
        Some(HabitMaintenanceChoice::Back) => {}
        None => println!("Invalid choice! Returning to main menu."),
    }
    Ok(())
}

fn delete_habit_flow(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    let raw = prompt(input, "Enter the habit number to delete: ")?;
    let deleted = match parse_item_number(&raw) {
        Some(number) => store.delete_habit(number)?,
        None => false,
    };
    if deleted {
        println!("Habit deleted!");
    } else {
        println!("Invalid habit number!");
    }
    Ok(())
}

fn delete_all_habits_flow(store: &mut Store, input: &mut impl BufRead) -> Result<()> {
    let confirm = prompt(input, "Are you sure you want to delete all habits? (y/n): ")?;
    if store.delete_all_habits(confirm.eq_ignore_ascii_case("y"))? {
        println!("All habits deleted!");
    } else {
        println!("Deletion canceled.");
    }
    Ok(())
}

fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input stream closed");
    }
    Ok(line.trim().to_string())
}

// ============================================================================
// RENDERING (DRAWING) - List and menu output
// ============================================================================

fn render_todos(doc: &Document) {
    println!("\n{}", "TinyToDo".blue());
    println!("{}", format!("Date: {}", day_stamp_label(today())).blue());
    println!("\n{}", "To-Do List:".blue());
    if doc.todos.is_empty() {
        println!("No to-dos available.");
    } else {
        for (i, todo) in doc.todos.iter().enumerate() {
            let status = if todo.done { "✓" } else { "0" };
            println!("{}. [{status}] {}", i + 1, todo.task);
        }
    }
    println!("\nNumber of Archived To-Dos: {}", doc.archive.len());
}

fn render_habits(doc: &Document) {
    println!(
        "\n{}",
        format!("Habits ({}):", day_stamp_label(today())).green()
    );
    if doc.habits.is_empty() {
        println!("No habits available.");
    } else {
        for (i, habit) in doc.habits.iter().enumerate() {
            println!(
                "{}. {} (Days Completed: {})",
                i + 1,
                habit.name,
                habit.completed_days
            );
        }
    }
}

fn render_main_menu() {
    println!("\nOptions:");
    println!("{}", "1. Add To-Do".blue());
    println!("{}", "2. Mark To-Do as Done".blue());
    println!("{}", "3. Delete To-Do".blue());
    println!("{}", "4. Add Habit".green());
    println!("{}", "5. Complete Habit".green());
    println!("{}", "6. Delete Habit".green());
    println!("{}", "7. Exit".green());
}

fn render_todo_maintenance_menu() {
    println!("\nOptions:");
    println!("{}", "1. Delete Selected To-Do".blue());
    println!("{}", "2. Delete All To-Dos".blue());
    println!("{}", "3. Archive Completed To-Dos".blue());
    println!("{}", "4. Return to Main Menu".blue());
}

fn render_habit_maintenance_menu() {
    println!("\nOptions:");
    println!("{}", "4. Delete Selected Habit".green());
    println!("{}", "5. Delete All Habits".green());
    println!("{}", "6. Return to Main Menu".green());
}

// ============================================================================
// PARSERS & VALIDATORS - Input validation with error messages
// ============================================================================

/// Parses a 1-based list position. Range checking is left to the store.
fn parse_item_number(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok()
}

/// Empty input keeps the current counter; anything else must be a
/// non-negative integer.
fn parse_day_count(text: &str) -> Result<Option<u32>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| "Invalid input! Keeping current number of days.".to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::{TempDir, tempdir};

    fn store_in(dir: &TempDir) -> Store {
        Store::load(dir.path().join("data.json")).expect("fresh store should load")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn added_todo_is_pending_with_given_date() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let day = today();

        store.add_todo("water plants".to_string(), day).unwrap();

        assert_eq!(store.doc.todos.len(), 1);
        assert!(!store.doc.todos[0].done);
        assert_eq!(store.doc.todos[0].date_added, day);
    }

    #[test]
    fn archive_moves_day_old_completed_todos() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let added = date(2024, 5, 1);
        store.add_todo("water plants".to_string(), added).unwrap();
        store.add_todo("file taxes".to_string(), added).unwrap();
        store.mark_done(1).unwrap();

        let moved = store
            .archive_stale_completed(added + Duration::days(1))
            .unwrap();

        assert_eq!(moved, 1);
        assert_eq!(store.doc.todos.len(), 1);
        assert_eq!(store.doc.todos[0].task, "file taxes");
        assert_eq!(store.doc.archive.len(), 1);
        assert!(store.doc.archive[0].done);
    }

    #[test]
    fn archive_keeps_todos_completed_same_day() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let added = date(2024, 5, 1);
        store.add_todo("water plants".to_string(), added).unwrap();
        store.mark_done(1).unwrap();

        let moved = store.archive_stale_completed(added).unwrap();

        assert_eq!(moved, 0);
        assert_eq!(store.doc.todos.len(), 1);
        assert!(store.doc.archive.is_empty());
    }

    #[test]
    fn archive_preserves_relative_order() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let added = date(2024, 5, 1);
        for task in ["a", "b", "c", "d"] {
            store.add_todo(task.to_string(), added).unwrap();
        }
        store.mark_done(1).unwrap();
        store.mark_done(3).unwrap();

        store
            .archive_stale_completed(added + Duration::days(2))
            .unwrap();

        let active: Vec<&str> = store.doc.todos.iter().map(|t| t.task.as_str()).collect();
        let archived: Vec<&str> = store.doc.archive.iter().map(|t| t.task.as_str()).collect();
        assert_eq!(active, ["b", "d"]);
        assert_eq!(archived, ["a", "c"]);
    }

    #[test]
    fn out_of_range_indices_change_nothing() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_todo("water plants".to_string(), today()).unwrap();
        store.add_habit("read".to_string()).unwrap();

        assert!(!store.mark_done(0).unwrap());
        assert!(!store.mark_done(2).unwrap());
        assert!(!store.delete_todo(0).unwrap());
        assert!(!store.delete_todo(5).unwrap());
        assert!(!store.delete_habit(2).unwrap());
        assert!(!store.set_habit_days(2, Some(3)).unwrap());

        assert_eq!(store.doc.todos.len(), 1);
        assert!(!store.doc.todos[0].done);
        assert_eq!(store.doc.habits.len(), 1);
        assert_eq!(store.doc.habits[0].completed_days, 0);
    }

    #[test]
    fn delete_todo_removes_the_selected_entry() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_todo("a".to_string(), today()).unwrap();
        store.add_todo("b".to_string(), today()).unwrap();

        assert!(store.delete_todo(1).unwrap());

        assert_eq!(store.doc.todos.len(), 1);
        assert_eq!(store.doc.todos[0].task, "b");
    }

    #[test]
    fn bulk_deletes_require_confirmation() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_todo("water plants".to_string(), today()).unwrap();
        store.add_habit("read".to_string()).unwrap();

        assert!(!store.delete_all_todos(false).unwrap());
        assert!(!store.delete_all_habits(false).unwrap());
        assert_eq!(store.doc.todos.len(), 1);
        assert_eq!(store.doc.habits.len(), 1);

        assert!(store.delete_all_todos(true).unwrap());
        assert!(store.delete_all_habits(true).unwrap());
        assert!(store.doc.todos.is_empty());
        assert!(store.doc.habits.is_empty());
    }

    #[test]
    fn habit_day_count_is_overwritten_not_incremented() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_habit("read".to_string()).unwrap();

        assert!(store.set_habit_days(1, Some(12)).unwrap());
        assert_eq!(store.doc.habits[0].completed_days, 12);

        assert!(store.set_habit_days(1, Some(3)).unwrap());
        assert_eq!(store.doc.habits[0].completed_days, 3);

        // None keeps the current counter.
        assert!(store.set_habit_days(1, None).unwrap());
        assert_eq!(store.doc.habits[0].completed_days, 3);
    }

    #[test]
    fn day_count_parser_keeps_blank_and_rejects_junk() {
        assert_eq!(parse_day_count(""), Ok(None));
        assert_eq!(parse_day_count("   "), Ok(None));
        assert_eq!(parse_day_count("12"), Ok(Some(12)));
        assert_eq!(parse_day_count(" 7 "), Ok(Some(7)));
        assert!(parse_day_count("abc").is_err());
        assert!(parse_day_count("-3").is_err());
    }

    #[test]
    fn save_then_load_round_trips_the_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut store = Store::load(&path).unwrap();
        store
            .add_todo("water plants".to_string(), date(2024, 5, 1))
            .unwrap();
        store
            .add_todo("file taxes".to_string(), date(2024, 5, 2))
            .unwrap();
        store.mark_done(2).unwrap();
        store.add_habit("read".to_string()).unwrap();
        store.set_habit_days(1, Some(9)).unwrap();
        store.archive_stale_completed(date(2024, 5, 4)).unwrap();

        let reloaded = Store::load(&path).unwrap();
        assert_eq!(reloaded.doc, store.doc);
    }

    #[test]
    fn missing_file_loads_an_empty_document() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.doc, Document::default());
    }

    #[test]
    fn corrupt_file_fails_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{not json").unwrap();

        assert!(Store::load(&path).is_err());
    }

    #[test]
    fn dates_serialize_with_weekday_label() {
        let doc = Document {
            todos: vec![Todo::new("water plants".to_string(), date(2024, 5, 1))],
            habits: vec![Habit::new("read".to_string())],
            archive: Vec::new(),
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["todos"][0]["date_added"], "2024-05-01 Wednesday");
        assert_eq!(value["habits"][0]["habit"], "read");
    }

    #[test]
    fn mismatched_weekday_label_is_rejected() {
        let raw = r#"{"task": "x", "done": false, "date_added": "2024-05-01 Friday"}"#;
        assert!(serde_json::from_str::<Todo>(raw).is_err());
    }

    #[test]
    fn document_without_archive_key_still_loads() {
        let raw = r#"{"todos": [], "habits": [{"habit": "read", "completed_days": 4}]}"#;
        let doc: Document = serde_json::from_str(raw).unwrap();
        assert!(doc.archive.is_empty());
        assert_eq!(doc.habits[0].name, "read");
        assert_eq!(doc.habits[0].completed_days, 4);
    }

    #[test]
    fn menu_choices_parse_from_digits() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::AddTodo));
        assert_eq!(MenuChoice::parse(" 7 "), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("8"), None);
        assert_eq!(MenuChoice::parse("exit"), None);

        assert_eq!(
            TodoMaintenanceChoice::parse("3"),
            Some(TodoMaintenanceChoice::ArchiveCompleted)
        );
        assert_eq!(TodoMaintenanceChoice::parse("5"), None);

        // Habit submenu keeps the main menu's habit-block numbering.
        assert_eq!(
            HabitMaintenanceChoice::parse("4"),
            Some(HabitMaintenanceChoice::DeleteOne)
        );
        assert_eq!(HabitMaintenanceChoice::parse("1"), None);
    }

    #[test]
    fn menu_loop_adds_a_todo_and_exits() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let script: &[u8] = b"1\nbuy milk\n7\n";

        run_menu(&mut store, &mut &script[..]).unwrap();

        assert_eq!(store.doc.todos.len(), 1);
        assert_eq!(store.doc.todos[0].task, "buy milk");
        assert!(!store.doc.todos[0].done);
    }

    #[test]
    fn menu_loop_survives_invalid_choices() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        // Junk choice, a mark attempt on an empty list, then exit.
        let script: &[u8] = b"banana\n2\n7\n";

        run_menu(&mut store, &mut &script[..]).unwrap();

        assert!(store.doc.todos.is_empty());
    }

    #[test]
    fn menu_loop_marks_done_and_confirms_bulk_delete() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_todo("water plants".to_string(), today()).unwrap();

        // Mark #1 done, open the maintenance menu, delete all with "y", exit.
        let script: &[u8] = b"2\n1\n3\n2\ny\n7\n";
        run_menu(&mut store, &mut &script[..]).unwrap();

        assert!(store.doc.todos.is_empty());
        assert!(store.doc.archive.is_empty());
    }
}
