use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;

use maktabati_sdk::{
    backup_file_name, highlight, Library, LibraryConfig, LoginOutcome, NewFile, NodeEdit, NodeKind,
    Submission, META_BACKUP_FILE_NAME,
};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let ctx = Globals {
        root: cli.root,
        password: cli.password,
        format: cli.format,
    };
    match cli.command {
        Command::Init(args) => cmd_init(&ctx, args),
        Command::Tree => cmd_tree(&ctx),
        Command::Show(args) => cmd_show(&ctx, args),
        Command::Search(args) => cmd_search(&ctx, args),
        Command::AddCategory(args) => cmd_add_category(&ctx, args),
        Command::AddItem(args) => cmd_add_item(&ctx, args),
        Command::Edit(args) => cmd_edit(&ctx, args),
        Command::Delete(args) => cmd_delete(&ctx, args),
        Command::Attach(args) => cmd_attach(&ctx, args),
        Command::Detach(args) => cmd_detach(&ctx, args),
        Command::GetFile(args) => cmd_get_file(&ctx, args),
        Command::Submit(args) => cmd_submit(&ctx, args),
        Command::Inbox(args) => cmd_inbox(&ctx, args),
        Command::Password(args) => cmd_password(&ctx, args),
        Command::Export(args) => cmd_export(&ctx, args),
        Command::Import(args) => cmd_import(&ctx, args),
        Command::ExportMeta(args) => cmd_export_meta(&ctx, args),
        Command::ImportMeta(args) => cmd_import_meta(&ctx, args),
    }
}

/// Global options every command sees.
struct Globals {
    root: PathBuf,
    password: Option<String>,
    format: OutputFormat,
}

impl Globals {
    fn open(&self) -> anyhow::Result<Library> {
        Library::open_dir(&self.root)
            .with_context(|| format!("opening library at {}", self.root.display()))
    }

    /// Open the library with an admin session, using --password.
    fn open_admin(&self) -> anyhow::Result<Library> {
        let lib = self.open()?;
        match lib.login(self.password.as_deref().unwrap_or(""))? {
            LoginOutcome::Granted | LoginOutcome::OpenAccess => Ok(lib),
            LoginOutcome::Rejected if self.password.is_none() => {
                tracing::debug!(root = %self.root.display(), "admin command without --password");
                bail!("this command needs the admin password (--password)")
            }
            LoginOutcome::Rejected => {
                tracing::warn!(root = %self.root.display(), "admin login rejected");
                bail!("wrong admin password")
            }
        }
    }

    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn cmd_init(ctx: &Globals, args: InitArgs) -> anyhow::Result<()> {
    let mut config = LibraryConfig::default();
    if let Some(app_name) = args.app_name {
        config.app_name = app_name;
    }
    if let Some(data_dir) = args.data_dir {
        config.root = data_dir;
    }
    let lib = Library::init_dir(&ctx.root, config)?;
    println!(
        "{} Initialized library in {}",
        "✓".green().bold(),
        ctx.root.display().to_string().bold()
    );
    println!("  App: {}", lib.config().app_name.cyan());
    println!("  Categories: {}", lib.categories().len());
    Ok(())
}

fn cmd_tree(ctx: &Globals) -> anyhow::Result<()> {
    let lib = ctx.open()?;
    let lines = lib.outline();
    if ctx.json() {
        return ctx.print_json(&lines);
    }
    for line in &lines {
        let indent = "  ".repeat(line.depth);
        match line.kind {
            NodeKind::Category => println!(
                "{}{} {}  {}",
                indent,
                line.icon.as_deref().unwrap_or(""),
                line.name.bold(),
                line.id.as_str().dimmed()
            ),
            NodeKind::Item => {
                let files = if line.attachments > 0 {
                    format!(" 📎{}", line.attachments)
                } else {
                    String::new()
                };
                println!("{}{}{}  {}", indent, line.name, files.cyan(), line.id.as_str().dimmed());
            }
        }
    }
    Ok(())
}

fn cmd_show(ctx: &Globals, args: ShowArgs) -> anyhow::Result<()> {
    let lib = ctx.open()?;
    let Some(view) = lib.show(&args.id) else {
        bail!("no node with id {}", args.id);
    };
    if ctx.json() {
        return ctx.print_json(&view);
    }
    match &view.icon {
        Some(icon) => println!("{} {}", icon, view.name.bold()),
        None => println!("{}", view.name.bold()),
    }
    println!("  Id: {}", view.id.as_str().dimmed());
    if let Some(parent) = &view.parent {
        println!("  Parent: {}", parent.as_str().dimmed());
    }
    if let Some(content) = view.content.as_deref().filter(|c| !c.is_empty()) {
        println!("\n{content}\n");
    }
    for file in &view.files {
        println!("  📎 {} ({}, {} bytes)  {}", file.name, file.mime, file.size, file.id.as_str().dimmed());
    }
    for child in &view.children {
        println!("  › {}  {}", child.name, child.id.as_str().dimmed());
    }
    Ok(())
}

fn cmd_search(ctx: &Globals, args: SearchArgs) -> anyhow::Result<()> {
    let lib = ctx.open()?;
    let term = args.term.trim();
    let hits = lib.search(term);
    if ctx.json() {
        return ctx.print_json(&hits);
    }
    if hits.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    for hit in &hits {
        println!(
            "{}{}  {}",
            "  ".repeat(hit.depth - 1),
            render_marks(&highlight(&hit.name, term)),
            hit.item_id.as_str().dimmed()
        );
    }
    Ok(())
}

fn cmd_add_category(ctx: &Globals, args: AddCategoryArgs) -> anyhow::Result<()> {
    let mut lib = ctx.open_admin()?;
    let id = lib.add_category(&args.name, &args.icon)?;
    report_id(ctx, "Added category", &id)
}

fn cmd_add_item(ctx: &Globals, args: AddItemArgs) -> anyhow::Result<()> {
    let mut lib = ctx.open_admin()?;
    let content = read_content(&args.content)?.unwrap_or_default();
    match lib.add_item(&args.parent, &args.name, &content)? {
        Some(id) => report_id(ctx, "Added item", &id),
        None => bail!("no category or item with id {}", args.parent),
    }
}

fn cmd_edit(ctx: &Globals, args: EditArgs) -> anyhow::Result<()> {
    let mut lib = ctx.open_admin()?;
    let edit = NodeEdit {
        name: args.name,
        icon: args.icon,
        content: read_content(&args.content)?,
    };
    if edit.is_empty() {
        bail!("nothing to change: pass --name, --icon, --content or --content-file");
    }
    if lib.edit(&args.id, &edit)? {
        println!("{} Updated {}", "✓".green(), args.id.yellow());
    } else {
        println!("No node with id {}.", args.id);
    }
    Ok(())
}

fn cmd_delete(ctx: &Globals, args: DeleteArgs) -> anyhow::Result<()> {
    let mut lib = ctx.open_admin()?;
    match lib.delete_node(&args.id)? {
        Some(report) if ctx.json() => ctx.print_json(&report),
        Some(report) => {
            println!(
                "{} Deleted {} ({} files removed)",
                "✓".green(),
                report.name.yellow(),
                report.files_removed
            );
            Ok(())
        }
        None => {
            println!("No node with id {}.", args.id);
            Ok(())
        }
    }
}

fn cmd_attach(ctx: &Globals, args: AttachArgs) -> anyhow::Result<()> {
    if args.paths.is_empty() {
        bail!("no files given");
    }
    let mut lib = ctx.open_admin()?;
    for path in &args.paths {
        let file = read_new_file(path, args.mime.as_deref())?;
        match lib.attach_file(&args.item, file)? {
            Some(attachment) => println!(
                "{} Attached {} ({} bytes)  {}",
                "✓".green(),
                attachment.name.bold(),
                attachment.size,
                attachment.id.as_str().dimmed()
            ),
            None => bail!("no item with id {}", args.item),
        }
    }
    Ok(())
}

fn cmd_detach(ctx: &Globals, args: DetachArgs) -> anyhow::Result<()> {
    let mut lib = ctx.open_admin()?;
    if lib.remove_attachment(&args.item, &args.file)? {
        println!("{} Removed attachment {}", "✓".green(), args.file.yellow());
    } else {
        println!("No attachment {} on {}.", args.file, args.item);
    }
    Ok(())
}

fn cmd_get_file(ctx: &Globals, args: GetFileArgs) -> anyhow::Result<()> {
    let lib = ctx.open()?;
    let Some(record) = lib.get_file(&args.id)? else {
        bail!("no stored file with id {}", args.id);
    };
    let output = args.output.unwrap_or_else(|| PathBuf::from(safe_file_name(&record.name)));
    std::fs::write(&output, &record.data).with_context(|| format!("writing {}", output.display()))?;
    println!(
        "{} Wrote {} ({} bytes)",
        "✓".green(),
        output.display().to_string().bold(),
        record.data.len()
    );
    Ok(())
}

fn cmd_submit(ctx: &Globals, args: SubmitArgs) -> anyhow::Result<()> {
    let lib = ctx.open()?;
    let mut submission = Submission::new(args.name, args.message);
    for path in &args.files {
        submission = submission.with_file(read_new_file(path, None)?);
    }
    let key = lib.submit_upload(submission)?;
    report_id(ctx, "Message sent", &key)
}

fn cmd_inbox(ctx: &Globals, args: InboxArgs) -> anyhow::Result<()> {
    let lib = ctx.open_admin()?;
    match args.action {
        InboxAction::List => {
            let mut uploads = lib.list_uploads()?;
            uploads.reverse();
            if ctx.json() {
                return ctx.print_json(&uploads);
            }
            if uploads.is_empty() {
                println!("No messages.");
            }
            for upload in &uploads {
                let when = upload
                    .record
                    .parsed_date()
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| upload.record.date.clone());
                println!("{}  {}  {}", upload.record.name.bold(), when.dimmed(), upload.key.as_str().yellow());
                if !upload.record.message.is_empty() {
                    println!("  {}", upload.record.message);
                }
                for file in &upload.record.files {
                    println!("  📎 {} ({} bytes)  {}", file.name, file.size, file.id.as_str().dimmed());
                }
            }
        }
        InboxAction::Delete { key } => {
            if lib.delete_upload(&key)? {
                println!("{} Deleted message {}", "✓".green(), key.yellow());
            } else {
                println!("No message with key {key}.");
            }
        }
        InboxAction::Clear => {
            let removed = lib.clear_uploads()?;
            println!("{} Cleared {} messages", "✓".green(), removed);
        }
    }
    Ok(())
}

fn cmd_password(ctx: &Globals, args: PasswordArgs) -> anyhow::Result<()> {
    match args.action {
        PasswordAction::Set { new_password } => {
            let mut lib = ctx.open_admin()?;
            lib.set_password(&new_password)?;
            println!("{} Admin password set", "✓".green());
        }
        PasswordAction::Clear => {
            let mut lib = ctx.open_admin()?;
            lib.clear_password()?;
            println!("{} Admin password cleared; access is open", "✓".green());
        }
        PasswordAction::Check { candidate } => {
            let lib = ctx.open()?;
            if !lib.has_password() {
                println!("No password is set.");
            } else if lib.check_password(&candidate)? {
                println!("{} Password matches", "✓".green());
            } else {
                println!("{} Password does not match", "✗".red());
            }
        }
    }
    Ok(())
}

fn cmd_export(ctx: &Globals, args: ExportArgs) -> anyhow::Result<()> {
    let lib = ctx.open_admin()?;
    let bundle = lib.export()?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(backup_file_name(chrono::Local::now().date_naive())));
    std::fs::write(&output, bundle.to_json()?).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(path = %output.display(), files = bundle.files.len(), "backup written");
    println!(
        "{} Exported {} files and {} messages to {}",
        "✓".green(),
        bundle.files.len(),
        bundle.uploads.len(),
        output.display().to_string().bold()
    );
    Ok(())
}

fn cmd_import(ctx: &Globals, args: ImportArgs) -> anyhow::Result<()> {
    let mut lib = ctx.open_admin()?;
    let json = read_text(&args.input)?;
    let report = lib.import(&json)?;
    if ctx.json() {
        return ctx.print_json(&report);
    }
    println!(
        "{} Imported {} categories, {} files, {} messages",
        "✓".green(),
        report.categories,
        report.files,
        report.uploads
    );
    Ok(())
}

fn cmd_export_meta(ctx: &Globals, args: ExportArgs) -> anyhow::Result<()> {
    let lib = ctx.open_admin()?;
    let json = lib.export_meta()?;
    let output = args.output.unwrap_or_else(|| PathBuf::from(META_BACKUP_FILE_NAME));
    std::fs::write(&output, json).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(path = %output.display(), "index backup written");
    println!("{} Exported index to {}", "✓".green(), output.display().to_string().bold());
    Ok(())
}

fn cmd_import_meta(ctx: &Globals, args: ImportArgs) -> anyhow::Result<()> {
    let mut lib = ctx.open_admin()?;
    let json = read_text(&args.input)?;
    let categories = lib.import_meta(&json)?;
    println!("{} Imported index ({} categories)", "✓".green(), categories);
    Ok(())
}

// ---- helpers ----

fn report_id(ctx: &Globals, what: &str, id: &maktabati_sdk::Id) -> anyhow::Result<()> {
    if ctx.json() {
        return ctx.print_json(&serde_json::json!({ "id": id }));
    }
    println!("{} {}  {}", "✓".green(), what, id.as_str().yellow());
    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_content(args: &ContentArgs) -> anyhow::Result<Option<String>> {
    match (&args.content, &args.content_file) {
        (Some(text), _) => Ok(Some(text.clone())),
        (None, Some(path)) => read_text(path).map(Some),
        (None, None) => Ok(None),
    }
}

fn read_new_file(path: &Path, mime: Option<&str>) -> anyhow::Result<NewFile> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".into());
    let mime = mime.map(str::to_string).unwrap_or_else(|| guess_mime(path).to_string());
    Ok(NewFile::new(name, mime, data))
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// The last path component of a stored name, so a record cannot write
/// outside the working directory.
fn safe_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    match base {
        "" | "." | ".." => "file".to_string(),
        other => other.to_string(),
    }
}

/// Turn `<mark>` spans from [`highlight`] into terminal emphasis.
fn render_marks(marked: &str) -> String {
    let mut out = String::new();
    let mut rest = marked;
    while let Some(start) = rest.find("<mark>") {
        out.push_str(&rest[..start]);
        let after = &rest[start + "<mark>".len()..];
        let end = after.find("</mark>").unwrap_or(after.len());
        out.push_str(&after[..end].yellow().bold().to_string());
        rest = after.get(end + "</mark>".len()..).unwrap_or("");
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_guess_by_extension() {
        assert_eq!(guess_mime(Path::new("a/Law.PDF")), "application/pdf");
        assert_eq!(guess_mime(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn stored_names_stay_local() {
        assert_eq!(safe_file_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_file_name("dir\\x.pdf"), "x.pdf");
        assert_eq!(safe_file_name(".."), "file");
        assert_eq!(safe_file_name("report.pdf"), "report.pdf");
    }

    #[test]
    fn marks_render_without_tags() {
        colored::control::set_override(false);
        assert_eq!(render_marks("a <mark>b</mark> c <mark>d</mark>"), "a b c d");
        assert_eq!(render_marks("plain"), "plain");
    }

    #[test]
    fn admin_open_honours_password() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Globals {
            root: dir.path().to_path_buf(),
            password: None,
            format: OutputFormat::Text,
        };
        assert!(ctx.open().is_err());
        Library::init_dir(dir.path(), LibraryConfig::default()).unwrap();

        let mut lib = ctx.open_admin().unwrap();
        lib.set_password("abc123").unwrap();
        drop(lib);
        assert!(ctx.open_admin().is_err());

        let ctx = Globals {
            password: Some("abc123".into()),
            ..ctx
        };
        assert!(ctx.open_admin().unwrap().is_admin().unwrap());
    }
}
