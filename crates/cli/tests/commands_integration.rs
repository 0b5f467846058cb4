//! End-to-end tests running the canopy binary against a mock backend

mod common;

use anyhow::Result;
use common::server::Backend;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn test_tree_lists_every_category() -> Result<()> {
    let backend = Backend::start().await;

    let result = canopy!(backend.config_path(), "tree")
        .server(&backend.base_url())
        .run()
        .await?;

    assert!(result.success(), "stderr: {}", result.stderr);
    for name in ["Electronics", "Phones", "Audio", "Books"] {
        assert!(result.contains_stdout(name), "missing {}", name);
    }
    assert!(result.contains_stdout("4 categories"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tree_focus_collapses_other_branches() -> Result<()> {
    let backend = Backend::start().await;

    let result = canopy!(backend.config_path(), "tree", "--focus", "books")
        .server(&backend.base_url())
        .run()
        .await?;

    assert!(result.success(), "stderr: {}", result.stderr);
    assert!(!result.contains_stdout("Phones"));
    assert!(result.contains_stdout("(+2)"));

    let missing = canopy!(backend.config_path(), "tree", "--focus", "toys")
        .server(&backend.base_url())
        .run()
        .await?;
    assert!(!missing.success());
    assert!(missing.contains_stderr("No category with slug 'toys'"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_prints_breadcrumb() -> Result<()> {
    let backend = Backend::start().await;

    let result = canopy!(backend.config_path(), "show", "phones")
        .server(&backend.base_url())
        .run()
        .await?;

    assert!(result.success(), "stderr: {}", result.stderr);
    assert!(result.contains_stdout("Electronics › Phones"));
    assert!(result.contains_stdout("Electronics (#1)"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_posts_to_server() -> Result<()> {
    let backend = Backend::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/categories"))
        .and(body_json(json!({ "name": "Tablets", "parentId": 1 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "categories": [
                {
                    "id": 1, "name": "Electronics", "slug": "electronics", "parentId": null,
                    "children": [
                        { "id": 9, "name": "Tablets", "slug": "tablets", "parentId": 1, "children": [] }
                    ]
                }
            ]
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let result = canopy!(backend.config_path(), "add", "  Tablets ", "--parent", "1")
        .server(&backend.base_url())
        .run()
        .await?;

    assert!(result.success(), "stderr: {}", result.stderr);
    assert!(result.contains_stdout("Created"));
    assert!(result.contains_stdout("#9 tablets"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rename_validation_error_reported() -> Result<()> {
    let backend = Backend::start().await;
    Mock::given(method("PATCH"))
        .and(path("/admin/categories/2"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The given data was invalid.",
            "errors": { "name": ["The name has already been taken."] }
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let result = canopy!(backend.config_path(), "rename", "2", "Books")
        .server(&backend.base_url())
        .run()
        .await?;

    assert!(!result.success());
    assert!(result.contains_stderr("The name has already been taken."));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_move_routes() -> Result<()> {
    let backend = Backend::start().await;
    Mock::given(method("PATCH"))
        .and(path("/admin/categories/2/move"))
        .and(body_json(json!({ "parentId": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::server::forest()))
        .expect(1)
        .mount(&backend.server)
        .await;

    let result = canopy!(backend.config_path(), "move", "2", "--to", "3")
        .server(&backend.base_url())
        .run()
        .await?;
    assert!(result.success(), "stderr: {}", result.stderr);

    // Into its own parent is refused locally
    let result = canopy!(backend.config_path(), "move", "2", "--to", "1")
        .server(&backend.base_url())
        .run()
        .await?;
    assert!(!result.success());
    assert!(result.contains_stderr("cannot be moved under 1"));

    // Already at the top level
    let result = canopy!(backend.config_path(), "move", "3", "--top")
        .server(&backend.base_url())
        .run()
        .await?;
    assert!(!result.success());
    assert!(result.contains_stderr("already at the top level"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_children_never_sent() -> Result<()> {
    let backend = Backend::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&backend.server)
        .await;

    let result = canopy!(backend.config_path(), "delete", "1", "-y")
        .server(&backend.base_url())
        .run()
        .await?;

    assert!(!result.success());
    assert!(result.contains_stderr("has children"));
    assert!(result.contains_stderr("nothing was sent"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_confirmation() -> Result<()> {
    let backend = Backend::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/categories/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&backend.server)
        .await;

    let declined = canopy!(backend.config_path(), "delete", "3")
        .server(&backend.base_url())
        .stdin("n\n")
        .run()
        .await?;
    assert!(declined.success(), "stderr: {}", declined.stderr);
    assert!(declined.contains_stdout("Cancelled"));

    let accepted = canopy!(backend.config_path(), "delete", "3")
        .server(&backend.base_url())
        .stdin("y\n")
        .run()
        .await?;
    assert!(accepted.success(), "stderr: {}", accepted.stderr);
    assert!(accepted.contains_stdout("Deleted"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_variants_search_and_pick() -> Result<()> {
    let backend = Backend::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/variants/search"))
        .and(query_param("q", "cable"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 10, "name": "1m", "sku": "USB-C-1M", "productName": "USB-C Cable" },
            { "id": 11, "name": "2m", "productName": "USB-C Cable" }
        ])))
        .expect(1)
        .mount(&backend.server)
        .await;

    let result = canopy!(
        backend.config_path(),
        "variants",
        "cable",
        "--limit",
        "5",
        "--pick",
        "11",
        "42"
    )
    .server(&backend.base_url())
    .run()
    .await?;

    assert!(result.success(), "stderr: {}", result.stderr);
    assert!(result.contains_stdout("USB-C Cable / 1m (USB-C-1M)"));
    assert!(result.contains_stdout("Attached:"));
    assert!(result.stdout.trim_end().ends_with("11"));
    assert!(result.contains_stderr("#42 is not in the results"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_listing_navigations() -> Result<()> {
    let backend = Backend::start().await;

    let result = canopy!(backend.config_path(), "listing")
        .server(&backend.base_url())
        .stdin("category phones\nsearch u\nsearch usb\n")
        .run()
        .await?;

    assert!(result.success(), "stderr: {}", result.stderr);
    let navigations = result.lines_starting_with("→");
    assert_eq!(navigations.len(), 2, "stdout: {}", result.stdout);
    assert!(navigations[0].starts_with("→ ?category=phones  "));
    assert!(navigations[0].contains("Electronics › Phones"));
    assert!(navigations[1].starts_with("→ ?category=phones&search=usb"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_listing_reload_resets_filters() -> Result<()> {
    let backend = Backend::start().await;

    let result = canopy!(backend.config_path(), "listing", "--reload", "--url", "?category=books")
        .server(&backend.base_url())
        .run()
        .await?;

    assert!(result.success(), "stderr: {}", result.stderr);
    assert!(result.contains_stdout("Loaded with no filters"));
    assert_eq!(result.lines_starting_with("→"), vec!["→ /"]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_server_fails_cleanly() -> Result<()> {
    let backend = Backend::start().await;

    let result = canopy!(backend.config_path(), "tree")
        .server("http://127.0.0.1:9/admin")
        .run()
        .await?;

    assert!(!result.success());
    assert!(result.contains_stderr("Failed to load categories"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_set_get_and_validation() -> Result<()> {
    let backend = Backend::start().await;
    let config = backend.config_path();

    canopy!(&config, "config", "set", "search.variant_limit", "7").run().await?;
    let get = canopy!(&config, "config", "get", "search.variant_limit").run().await?;
    assert_eq!(get.stdout.trim(), "7");

    let rejected = canopy!(&config, "config", "set", "filter.search_debounce_ms", "900")
        .run()
        .await?;
    assert!(!rejected.success());
    assert!(rejected.contains_stderr("search_debounce_ms must be between 300 and 500"));

    let unknown = canopy!(&config, "config", "get", "server.colour").run().await?;
    assert!(!unknown.success());

    let created = canopy!(backend.config_dir.path().join("fresh.toml"), "config", "path", "--create")
        .run()
        .await?;
    assert!(created.contains_stdout("Created config file"));
    Ok(())
}
