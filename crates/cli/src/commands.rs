use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use bookshelf_client::genres::{genres, is_known_genre};
use bookshelf_client::{
    BookForm, BookId, BookPayload, BooksApi, CatalogController, ClientError, Column, FormField, HttpBooksApi,
    PageView, QueryCache, TableState,
};
use bookshelf_db::Database;
use bookshelf_kernel::{settings::Settings, ModuleRegistry};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};

use crate::cli::{CreateArgs, EditArgs, ListArgs};

type Controller = CatalogController<HttpBooksApi>;

pub async fn run_serve(settings: &Settings) -> Result<()> {
    bookshelf_app::serve(settings).await
}

pub async fn run_openapi() -> Result<()> {
    let db = Database::in_memory()
        .await
        .context("failed to open scratch database")?;
    let mut registry = ModuleRegistry::new();
    bookshelf_app::modules::register_all(&mut registry, &db);

    let document = bookshelf_http::router::merged_openapi(&registry);
    println!("{}", serde_json::to_string_pretty(&document)?);
    db.close().await;
    Ok(())
}

pub fn run_genres() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Genre"]);
    apply_table_style(&mut table);
    for genre in genres() {
        table.add_row(vec![genre.id.to_string(), genre.name.clone()]);
    }
    println!("{table}");
    Ok(())
}

pub async fn run_list(api: HttpBooksApi, page_size: usize, args: &ListArgs) -> Result<()> {
    let mut catalog = controller(api, args.page_size.unwrap_or(page_size));
    if let Some(filter) = &args.filter {
        catalog.table_mut().set_global_filter(filter.as_str());
    }
    catalog.table_mut().set_sorting(args.sort);

    let first = catalog.page().await.map_err(describe)?;
    catalog
        .table_mut()
        .go_to_page(args.page.saturating_sub(1), first.page_count);
    let view = catalog.page().await.map_err(describe)?;

    println!("{}", render_page(catalog.table(), &view));
    println!(
        "{} ({} matching book{})",
        view.label(),
        view.filtered_count,
        if view.filtered_count == 1 { "" } else { "s" }
    );
    Ok(())
}

pub async fn run_show(api: HttpBooksApi, id: BookId) -> Result<()> {
    let book = api.get(id).await.map_err(describe)?;

    let mut table = Table::new();
    apply_table_style(&mut table);
    for column in Column::ALL.into_iter().filter(|column| column.sortable()) {
        table.add_row(vec![column.header().to_string(), column.cell_text(&book)]);
    }
    println!("{table}");
    Ok(())
}

pub async fn run_create(api: HttpBooksApi, page_size: usize, args: &CreateArgs) -> Result<()> {
    let mut catalog = controller(api, page_size);
    catalog.open_create();
    let form = catalog
        .modal_mut()
        .form_mut()
        .context("create form did not open")?;
    form.set(FormField::Title, args.title.as_str());
    form.set(FormField::Author, args.author.as_str());
    form.set(FormField::Genre, args.genre.as_str());
    form.set(FormField::Description, args.description.as_str());
    form.set(FormField::PublishedDate, args.published_date.as_str());
    warn_form(form);

    catalog.submit().await.map_err(describe)?;
    println!("Book created successfully");
    Ok(())
}

/// Full replace over `PUT`; every field must be supplied.
pub async fn run_replace(api: HttpBooksApi, id: BookId, args: &CreateArgs) -> Result<()> {
    let payload = BookPayload {
        title: args.title.clone(),
        author: args.author.clone(),
        genre: args.genre.clone(),
        description: args.description.clone(),
        published_date: args.published_date.clone(),
    };
    if !is_known_genre(&payload.genre) {
        eprintln!("warning: '{}' is not one of the listed genres", payload.genre);
    }

    let message = api.replace(id, &payload).await.map_err(describe)?;
    println!("{message}");
    Ok(())
}

pub async fn run_edit(
    api: HttpBooksApi,
    page_size: usize,
    id: BookId,
    args: &EditArgs,
) -> Result<()> {
    let changes = [
        (FormField::Title, &args.title),
        (FormField::Author, &args.author),
        (FormField::Genre, &args.genre),
        (FormField::Description, &args.description),
        (FormField::PublishedDate, &args.published_date),
    ];
    if changes.iter().all(|(_, value)| value.is_none()) {
        bail!("nothing to change; pass at least one field flag");
    }

    let book = api.get(id).await.map_err(describe)?;
    let mut catalog = controller(api, page_size);
    catalog.open_edit(&book);
    let form = catalog
        .modal_mut()
        .form_mut()
        .context("edit form did not open")?;
    for (field, value) in changes {
        if let Some(value) = value {
            form.set(field, value.as_str());
        }
    }
    warn_form(form);

    catalog.submit().await.map_err(describe)?;
    println!("Book updated successfully");
    Ok(())
}

pub async fn run_delete(api: HttpBooksApi, page_size: usize, id: BookId, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Are you sure you want to delete book {id}?"))? {
        println!("Cancelled");
        return Ok(());
    }

    let mut catalog = controller(api, page_size);
    catalog.open_delete(id);
    catalog.confirm_delete().await.map_err(describe)?;
    println!("Book deleted successfully");
    Ok(())
}

fn controller(api: HttpBooksApi, page_size: usize) -> Controller {
    CatalogController::new(Arc::new(api), Arc::new(QueryCache::new()), page_size)
}

fn render_page(state: &TableState, view: &PageView) -> Table {
    let columns: Vec<Column> = Column::ALL
        .into_iter()
        .filter(|column| column.sortable())
        .collect();

    let mut table = Table::new();
    table.set_header(
        columns
            .iter()
            .map(|column| match state.sorting() {
                Some(spec) if spec.column == *column => {
                    format!("{} {}", column.header(), spec.direction.arrow())
                }
                _ => column.header().to_string(),
            })
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);

    for book in &view.rows {
        table.add_row(
            columns
                .iter()
                .map(|column| column.cell_text(book))
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn warn_form(form: &BookForm) {
    let genre = form.get(FormField::Genre);
    if !is_known_genre(genre) {
        eprintln!("warning: '{genre}' is not one of the listed genres");
    }
    if form.description_exceeds_limit() {
        tracing::warn!(
            count = form.description_count(),
            "description is over the suggested length"
        );
        eprintln!("warning: {}", form.description_counter());
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Spell out server validation errors field by field.
fn describe(err: ClientError) -> anyhow::Error {
    let lines: Vec<String> = match &err {
        ClientError::Validation { fields, .. } => fields
            .iter()
            .flat_map(|(field, messages)| {
                let label = FormField::ALL
                    .into_iter()
                    .find(|candidate| candidate.wire_name() == field.as_str())
                    .map_or(field.as_str(), |candidate| candidate.label());
                messages.iter().map(move |message| format!("  {label}: {message}"))
            })
            .collect(),
        _ => Vec::new(),
    };

    let err = anyhow::Error::new(err);
    if lines.is_empty() {
        err
    } else {
        err.context(format!("validation failed:\n{}", lines.join("\n")))
    }
}
