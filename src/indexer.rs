use std::path::Path;

use anyhow::Context as _;
use log::{debug, info, warn};

use crate::{
    context::Context,
    metadata::{parse_front_matter, Mapping},
    output::write_index,
};

mod data;
mod utils;

use data::{ArticleRecord, DateValue};
use utils::sort_articles;

pub(crate) const ARTICLE_EXTENSION: &str = ".md";

/// Converts a front matter value to JSON as-is, or `default` when it is absent.
fn pass_through(fm: &Mapping, key: &str, default: &str) -> serde_json::Value {
    fm.get(key)
        .map(|v| v.to_json())
        .unwrap_or_else(|| serde_json::Value::from(default))
}

pub(crate) fn build_record(file_name: &str, fm: &Mapping) -> ArticleRecord {
    let slug = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let date = fm
        .get("date")
        .map(|v| DateValue::from_yaml(v).to_iso_string())
        .unwrap_or_default();

    ArticleRecord {
        title: pass_through(fm, "title", &slug),
        date,
        image: pass_through(fm, "image", ""),
        thumbnail: pass_through(fm, "thumbnail", ""),
        slug,
    }
}

/// Builds one record per `.md` file in `article_dir`, in directory listing order.
pub(crate) fn scan_articles(article_dir: &Path) -> anyhow::Result<Vec<ArticleRecord>> {
    let mut articles = vec![];

    for entry in std::fs::read_dir(article_dir)
        .with_context(|| format!("while reading directory {article_dir:?}"))?
    {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            warn!("Skipping non UTF-8 file name: {file_name:?}");
            continue;
        };
        if !file_name.ends_with(ARTICLE_EXTENSION) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            debug!("Skipping {path:?}: not a file");
            continue;
        }

        debug!("Reading {path:?}...");
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("while reading {path:?}"))?;
        let fm = parse_front_matter(&content);
        if fm.is_empty() {
            debug!("no front matter in {path:?}");
        }
        let article = build_record(file_name, &fm);
        debug!("done. slug: {}", article.slug);
        articles.push(article);
    }

    Ok(articles)
}

/// Scans, sorts and writes the index. Returns the number of indexed articles.
pub(crate) fn build_index(ctx: &Context) -> anyhow::Result<usize> {
    let mut articles = scan_articles(&ctx.article_dir)?;
    sort_articles(&mut articles);

    write_index(&ctx.out_file, &articles, ctx.require_existing)?;
    info!(
        "Wrote {} with {} items.",
        ctx.out_file.display(),
        articles.len()
    );

    Ok(articles.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn fm(yaml: &str) -> Mapping {
        parse_front_matter(&format!("---\n{yaml}---\n"))
    }

    fn write_article(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn context(dir: &TempDir, require_existing: bool) -> Context {
        let article_dir = dir.path().join("articles");
        std::fs::create_dir_all(&article_dir).unwrap();
        Context::new(article_dir, dir.path().join("articles.json"), require_existing).unwrap()
    }

    #[test]
    fn test_record_from_full_front_matter() {
        let meta = fm("title: Hello\ndate: 2024-01-01\nimage: a.png\nthumbnail: a_s.png\n");
        let record = build_record("hello.md", &meta);
        assert_eq!(record.slug, "hello");
        assert_eq!(record.title, json!("Hello"));
        assert_eq!(record.date, "2024-01-01");
        assert_eq!(record.image, json!("a.png"));
        assert_eq!(record.thumbnail, json!("a_s.png"));
    }

    #[test]
    fn test_record_defaults() {
        let record = build_record("no-meta.md", &Mapping::new());
        assert_eq!(record.slug, "no-meta");
        assert_eq!(record.title, json!("no-meta"));
        assert_eq!(record.date, "");
        assert_eq!(record.image, json!(""));
        assert_eq!(record.thumbnail, json!(""));
    }

    #[test]
    fn test_record_passes_non_string_title_through() {
        let record = build_record("n.md", &fm("title: 42\ndate: 2024-01-01 10:00:00\n"));
        assert_eq!(record.title, json!(42));
        assert_eq!(record.date, "2024-01-01T10:00:00");
    }

    #[test]
    fn test_record_keeps_quoted_date_verbatim() {
        let record = build_record("q.md", &fm("date: \"2024-01-01 10:00:00\"\n"));
        assert_eq!(record.date, "2024-01-01 10:00:00");
    }

    #[test]
    fn test_record_with_repeated_keys_uses_last_value() {
        let record = build_record("d.md", &fm("title: A\ntitle: B\ndate: 2024-01-01\n"));
        assert_eq!(record.title, json!("B"));
        assert_eq!(record.date, "2024-01-01");
    }

    #[test]
    fn test_record_resolves_yaml11_booleans() {
        let record = build_record("b.md", &fm("title: yes\nimage: off\n"));
        assert_eq!(record.title, json!(true));
        assert_eq!(record.image, json!(false));
    }

    #[test]
    fn test_slug_strips_last_extension_only() {
        assert_eq!(build_record("a.b.md", &Mapping::new()).slug, "a.b");
        assert_eq!(build_record(".md", &Mapping::new()).slug, ".md");
    }

    #[test]
    fn test_scan_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "a.md", "---\ntitle: A\n---\n");
        write_article(dir.path(), "notes.txt", "---\ntitle: T\n---\n");
        write_article(dir.path(), "README", "");
        std::fs::create_dir(dir.path().join("drafts.md")).unwrap();

        let articles = scan_articles(dir.path()).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].slug, "a");
    }

    #[test]
    fn test_scan_keeps_malformed_articles() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "broken.md", "---\ntitle: [oops\n---\nbody");

        let articles = scan_articles(dir.path()).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, json!("broken"));
        assert_eq!(articles[0].date, "");
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        assert!(scan_articles(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_build_index_scenario() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, false);
        write_article(&ctx.article_dir, "a.md", "---\ntitle: Hello\ndate: 2024-01-01\n---\nHi\n");
        write_article(&ctx.article_dir, "b.md", "No front matter here.\n");

        assert_eq!(build_index(&ctx).unwrap(), 2);

        let written = std::fs::read_to_string(&ctx.out_file).unwrap();
        let expected = concat!(
            "[\n",
            "  {\n",
            "    \"slug\": \"a\",\n",
            "    \"title\": \"Hello\",\n",
            "    \"date\": \"2024-01-01\",\n",
            "    \"image\": \"\",\n",
            "    \"thumbnail\": \"\"\n",
            "  },\n",
            "  {\n",
            "    \"slug\": \"b\",\n",
            "    \"title\": \"b\",\n",
            "    \"date\": \"\",\n",
            "    \"image\": \"\",\n",
            "    \"thumbnail\": \"\"\n",
            "  }\n",
            "]",
        );
        assert_eq!(written, expected);
    }

    #[test]
    fn test_build_index_orders_by_date() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, false);
        write_article(&ctx.article_dir, "x.md", "---\ndate: 2023-12-15\n---\n");
        write_article(&ctx.article_dir, "y.md", "plain\n");
        write_article(&ctx.article_dir, "z.md", "---\ndate: 2024-03-01\n---\n");

        build_index(&ctx).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&ctx.out_file).unwrap()).unwrap();
        let slugs: Vec<&str> = written
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["z", "x", "y"]);
    }

    #[test]
    fn test_build_index_keeps_non_ascii() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, false);
        write_article(&ctx.article_dir, "nikki.md", "---\ntitle: 日記\n---\n");

        build_index(&ctx).unwrap();

        let written = std::fs::read_to_string(&ctx.out_file).unwrap();
        assert!(written.contains("\"title\": \"日記\""));
    }

    #[test]
    fn test_build_index_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, true);
        write_article(&ctx.article_dir, "a.md", "---\ntitle: A\ndate: 2024-01-02\n---\n");
        write_article(&ctx.article_dir, "b.md", "---\ntitle: B\ndate: 2024-01-01\n---\n");
        write_article(&ctx.article_dir, "c.md", "c\n");
        std::fs::write(&ctx.out_file, "stale").unwrap();

        build_index(&ctx).unwrap();
        let first = std::fs::read(&ctx.out_file).unwrap();
        build_index(&ctx).unwrap();
        let second = std::fs::read(&ctx.out_file).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_build_index_require_existing_aborts_without_output() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, true);
        write_article(&ctx.article_dir, "a.md", "---\ntitle: A\n---\n");

        assert!(build_index(&ctx).is_err());
        assert!(!ctx.out_file.exists());
    }

    #[test]
    fn test_build_index_creates_missing_output() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, false);

        assert_eq!(build_index(&ctx).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&ctx.out_file).unwrap(), "[]");
    }
}
