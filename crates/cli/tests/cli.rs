use assert_cmd::Command;

fn bookshelf() -> Command {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.env("BOOKSHELF_ENV", "local")
        .env("BOOKSHELF_CONFIG_DIR", std::env::temp_dir().join("bookshelf-cli-no-config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn genres_lists_the_bundled_names() {
    let output = bookshelf().arg("genres").assert().success().get_output().clone();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Sci-Fi"));
    assert!(stdout.contains("Romance"));
}

#[test]
fn openapi_prints_the_books_routes() {
    let output = bookshelf().arg("openapi").assert().success().get_output().clone();
    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(document["paths"]["/api/v1/books"]["get"].is_object());
    assert!(document["paths"]["/api/v1/books/{id}"]["delete"].is_object());
}

#[test]
fn sorting_by_the_action_column_is_refused() {
    bookshelf()
        .args(["books", "list", "--sort", "action"])
        .assert()
        .failure();
}

#[test]
fn edit_without_fields_fails_before_any_request() {
    let output = bookshelf()
        .args(["--api-url", "http://127.0.0.1:9/api/v1", "books", "edit", "1"])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("nothing to change"));
}

#[test]
fn replace_requires_every_field() {
    bookshelf()
        .args(["books", "replace", "1", "--title", "Dune"])
        .assert()
        .failure();
}

#[test]
fn replace_warns_about_unlisted_genres() {
    let output = bookshelf()
        .args([
            "--api-url",
            "http://127.0.0.1:9/api/v1",
            "books",
            "replace",
            "1",
            "--title",
            "Dune",
            "--author",
            "Herbert",
            "--genre",
            "Space Opera",
            "--description",
            "Desert planet",
            "--published-date",
            "1965-08-01",
        ])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("'Space Opera' is not one of the listed genres"));
}
