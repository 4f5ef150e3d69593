pub mod models;
pub mod resource;
pub mod routes;
pub mod service;
pub mod validation;

use async_trait::async_trait;
use axum::Router;
use bookshelf_db::Database;
use bookshelf_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use service::BookService;

/// Book catalog module: CRUD over the `books` table
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(db: Database) -> Self {
        Self {
            service: BookService::new(db),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book_body = |schema: &str| {
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{schema}") }
                    }
                }
            })
        };
        let book_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let acknowledgement = json!({
            "description": "Acknowledgement",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Acknowledgement" }
                }
            }
        });
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);
        let string_field = |description: &str| json!({ "type": "string", "description": description });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every stored book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": book_body("BookInput"),
                        "responses": {
                            "201": book_response("Created book"),
                            "400": error("Malformed JSON body"),
                            "422": error("Validation error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "responses": {
                            "200": book_response("The book"),
                            "404": error("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Replace every field of a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "requestBody": book_body("BookInput"),
                        "responses": {
                            "200": acknowledgement.clone(),
                            "404": error("Book not found"),
                            "422": error("Validation error")
                        }
                    },
                    "patch": {
                        "summary": "Update the supplied fields of a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "requestBody": book_body("BookPatch"),
                        "responses": {
                            "200": acknowledgement.clone(),
                            "404": error("Book not found"),
                            "422": error("Validation error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": acknowledgement,
                            "404": error("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Server-assigned identifier"
                            },
                            "title": string_field("Title of the book"),
                            "author": string_field("Author of the book"),
                            "genre": string_field("Genre name"),
                            "description": string_field("Short description"),
                            "publishedDate": {
                                "type": "string",
                                "format": "date-time",
                                "description": "Publication date at UTC midnight"
                            }
                        },
                        "required": ["id", "title", "author", "genre", "description", "publishedDate"]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "title": string_field("Title of the book"),
                            "author": string_field("Author of the book"),
                            "genre": string_field("Genre name"),
                            "description": string_field("Short description"),
                            "publishedDate": string_field("Publication date, YYYY-MM-DD or ISO-8601 date-time")
                        },
                        "required": ["title", "author", "genre", "description", "publishedDate"]
                    },
                    "BookPatch": {
                        "type": "object",
                        "properties": {
                            "title": string_field("Title of the book"),
                            "author": string_field("Author of the book"),
                            "genre": string_field("Genre name"),
                            "description": string_field("Short description"),
                            "publishedDate": string_field("Publication date, YYYY-MM-DD or ISO-8601 date-time")
                        }
                    },
                    "Acknowledgement": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" }
                        },
                        "required": ["message"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE books (
                    id             INTEGER PRIMARY KEY AUTOINCREMENT,
                    title          TEXT NOT NULL CHECK (title <> ''),
                    author         TEXT NOT NULL CHECK (author <> ''),
                    genre          TEXT NOT NULL CHECK (genre <> ''),
                    description    TEXT NOT NULL CHECK (description <> ''),
                    published_date TEXT NOT NULL
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.service.count().await?;
        tracing::info!(module = self.name(), books = count, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(db: Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(db))
}
