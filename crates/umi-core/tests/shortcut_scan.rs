use std::path::{Path, PathBuf};

use anyhow::anyhow;
use uuid::Uuid;

use umi_core::app::AppInfo;
use umi_core::error::ErrorKind;
use umi_core::shortcut::{
    app_data_dir, create_shortcut, delete_shortcuts, free_link_path, LinkBackend, ShellRoots,
    ShortcutPosition, MAX_NAME_SUFFIX,
};

/// 以纯文本模拟 `.lnk`：内容为 `LNK:<target>`；内容为 `BROKEN` 时解析报错。
struct TextLinks;

impl LinkBackend for TextLinks {
    fn create_link(&self, target: &Path, link: &Path) -> anyhow::Result<()> {
        std::fs::write(link, format!("LNK:{}", target.display()))?;
        Ok(())
    }

    fn link_target(&self, path: &Path) -> anyhow::Result<Option<PathBuf>> {
        let content = std::fs::read_to_string(path)?;
        if content == "BROKEN" {
            return Err(anyhow!("拒绝访问"));
        }
        Ok(content.strip_prefix("LNK:").map(PathBuf::from))
    }
}

/// 解析到 `gone.lnk` 时抢先删除该文件，使随后的删除失败。
struct VanishingLinks;

impl LinkBackend for VanishingLinks {
    fn create_link(&self, target: &Path, link: &Path) -> anyhow::Result<()> {
        TextLinks.create_link(target, link)
    }

    fn link_target(&self, path: &Path) -> anyhow::Result<Option<PathBuf>> {
        let target = TextLinks.link_target(path)?;
        if path.file_name().is_some_and(|n| n == "gone.lnk") {
            std::fs::remove_file(path)?;
        }
        Ok(target)
    }
}

struct FailingLinks;

impl LinkBackend for FailingLinks {
    fn create_link(&self, _target: &Path, _link: &Path) -> anyhow::Result<()> {
        Err(anyhow!("拒绝访问。 (os error 5)"))
    }

    fn link_target(&self, _path: &Path) -> anyhow::Result<Option<PathBuf>> {
        Ok(None)
    }
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn roots_in(base: &Path) -> ShellRoots {
    ShellRoots {
        desktop: base.join("Desktop"),
        app_data: base.join("AppData"),
    }
}

fn app_with_exe(base: &Path) -> AppInfo {
    let exe = base.join("Umi-OCR.exe");
    std::fs::write(&exe, "exe").expect("write exe");
    AppInfo::new("Umi-OCR", Some(exe))
}

#[test]
fn resolve_directory_stays_under_expected_roots() {
    let roots = ShellRoots {
        desktop: PathBuf::from("C:/Users/u/Desktop"),
        app_data: PathBuf::from("C:/Users/u/AppData/Roaming"),
    };
    let start_menu = roots
        .app_data
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu");

    assert_eq!(roots.resolve(ShortcutPosition::Desktop), roots.desktop);
    assert_eq!(app_data_dir(&roots.app_data, ShortcutPosition::Desktop), None);
    assert_eq!(
        app_data_dir(&roots.app_data, ShortcutPosition::StartMenu),
        Some(start_menu.clone())
    );
    assert_eq!(roots.resolve(ShortcutPosition::StartMenu), start_menu);
    assert_eq!(
        roots.resolve(ShortcutPosition::Startup),
        start_menu.join("Programs").join("Startup")
    );
    for position in ShortcutPosition::ALL {
        let dir = roots.resolve(position);
        assert!(
            dir.starts_with(&roots.desktop) || dir.starts_with(&roots.app_data),
            "{position}: {}",
            dir.display()
        );
    }
}

#[test]
fn position_parses_boundary_names() {
    assert_eq!("desktop".parse::<ShortcutPosition>().unwrap(), ShortcutPosition::Desktop);
    assert_eq!("startMenu".parse::<ShortcutPosition>().unwrap(), ShortcutPosition::StartMenu);
    assert_eq!("start-menu".parse::<ShortcutPosition>().unwrap(), ShortcutPosition::StartMenu);
    assert_eq!("startup".parse::<ShortcutPosition>().unwrap(), ShortcutPosition::Startup);
    assert!("taskbar".parse::<ShortcutPosition>().is_err());
}

#[test]
fn create_appends_numeric_suffix_on_collision() {
    let dir = unique_temp_dir("umi-core-shortcut-create");
    let _cleanup = CleanupDir(dir.clone());
    let app = app_with_exe(&dir);
    let roots = roots_in(&dir);

    let desktop = roots.resolve(ShortcutPosition::Desktop);

    let first = create_shortcut(&app, &desktop, &TextLinks).expect("first");
    let second = create_shortcut(&app, &desktop, &TextLinks).expect("second");
    let third = create_shortcut(&app, &desktop, &TextLinks).expect("third");

    assert_eq!(first, roots.desktop.join("Umi-OCR.lnk"));
    assert_eq!(second, roots.desktop.join("Umi-OCR (1).lnk"));
    assert_eq!(third, roots.desktop.join("Umi-OCR (2).lnk"));

    let original = std::fs::read_to_string(&first).expect("read first");
    assert!(original.starts_with("LNK:"));
}

#[test]
fn create_fills_first_free_gap() {
    let dir = unique_temp_dir("umi-core-shortcut-gap");
    let _cleanup = CleanupDir(dir.clone());
    std::fs::write(dir.join("App.lnk"), "x").unwrap();
    std::fs::write(dir.join("App (2).lnk"), "x").unwrap();

    assert_eq!(free_link_path(&dir, "App"), Some(dir.join("App (1).lnk")));
}

#[test]
fn create_fails_when_every_suffix_is_taken() {
    let dir = unique_temp_dir("umi-core-shortcut-full");
    let _cleanup = CleanupDir(dir.clone());
    let app = app_with_exe(&dir);
    let desktop = roots_in(&dir).resolve(ShortcutPosition::Desktop);
    std::fs::create_dir_all(&desktop).unwrap();
    std::fs::write(desktop.join("Umi-OCR.lnk"), "x").unwrap();
    for i in 1..=MAX_NAME_SUFFIX {
        std::fs::write(desktop.join(format!("Umi-OCR ({i}).lnk")), "x").unwrap();
    }
    let before = std::fs::read_dir(&desktop).unwrap().count();

    assert_eq!(free_link_path(&desktop, "Umi-OCR"), None);
    let err = create_shortcut(&app, &desktop, &TextLinks).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ShortcutCreationFailed);
    assert!(err.to_string().contains("lnkPath: "), "{err}");
    assert_eq!(std::fs::read_dir(&desktop).unwrap().count(), before);
    assert!(!desktop.join(format!("Umi-OCR ({}).lnk", MAX_NAME_SUFFIX + 1)).exists());
}

#[test]
fn create_without_exe_reports_executable_not_found() {
    let dir = unique_temp_dir("umi-core-shortcut-noexe");
    let _cleanup = CleanupDir(dir.clone());
    let roots = roots_in(&dir);

    let unset = AppInfo::new("Umi-OCR", None);
    let err = create_shortcut(&unset, &roots.desktop, &TextLinks).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutableNotFound);

    let missing = AppInfo::new("Umi-OCR", Some(dir.join("nope.exe")));
    let startup = roots.resolve(ShortcutPosition::Startup);
    let err = create_shortcut(&missing, &startup, &TextLinks).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutableNotFound);
    assert!(err.to_string().contains("nope.exe"));
    assert!(!startup.exists());
}

#[test]
fn create_reports_backend_failure() {
    let dir = unique_temp_dir("umi-core-shortcut-fail");
    let _cleanup = CleanupDir(dir.clone());
    let app = app_with_exe(&dir);

    let start_menu = roots_in(&dir).resolve(ShortcutPosition::StartMenu);
    let err = create_shortcut(&app, &start_menu, &FailingLinks).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShortcutCreationFailed);
    let msg = err.to_string();
    assert!(msg.contains("os error 5"), "{msg}");
    assert!(msg.contains("Umi-OCR.lnk"), "{msg}");
}

#[test]
fn delete_removes_matching_shortcuts_and_survives_entry_failures() {
    let dir = unique_temp_dir("umi-core-shortcut-delete");
    let _cleanup = CleanupDir(dir.clone());
    let app = AppInfo::new("Umi-OCR", None);
    let roots = roots_in(&dir);
    let desktop = roots.resolve(ShortcutPosition::Desktop);
    std::fs::create_dir_all(desktop.join("subdir")).unwrap();

    std::fs::write(desktop.join("Umi-OCR.lnk"), "LNK:C:\\Apps\\Umi-OCR.exe").unwrap();
    std::fs::write(desktop.join("Umi-OCR (1).lnk"), "LNK:C:\\Apps\\Umi-OCR.exe").unwrap();
    std::fs::write(desktop.join("renamed.lnk"), "LNK:D:/old/Umi-OCR_v2.exe").unwrap();
    std::fs::write(desktop.join("other.lnk"), "LNK:C:\\Apps\\Other.exe").unwrap();
    std::fs::write(desktop.join("notes.txt"), "Umi-OCR").unwrap();
    std::fs::write(desktop.join("locked.lnk"), "BROKEN").unwrap();

    let removed = delete_shortcuts(&app, &desktop, &TextLinks);

    assert_eq!(removed, 3);
    assert!(!desktop.join("Umi-OCR.lnk").exists());
    assert!(!desktop.join("Umi-OCR (1).lnk").exists());
    assert!(!desktop.join("renamed.lnk").exists());
    assert!(desktop.join("other.lnk").exists());
    assert!(desktop.join("notes.txt").exists());
    assert!(desktop.join("locked.lnk").exists());
    assert!(desktop.join("subdir").is_dir());
}

#[test]
fn delete_counts_only_files_actually_removed() {
    let dir = unique_temp_dir("umi-core-shortcut-vanish");
    let _cleanup = CleanupDir(dir.clone());
    let app = AppInfo::new("Umi-OCR", None);
    let startup = roots_in(&dir).resolve(ShortcutPosition::Startup);
    std::fs::create_dir_all(&startup).unwrap();

    std::fs::write(startup.join("Umi-OCR.lnk"), "LNK:C:\\Apps\\Umi-OCR.exe").unwrap();
    std::fs::write(startup.join("gone.lnk"), "LNK:C:\\Apps\\Umi-OCR.exe").unwrap();
    std::fs::write(startup.join("Umi-OCR (1).lnk"), "LNK:C:\\Apps\\Umi-OCR.exe").unwrap();

    let removed = delete_shortcuts(&app, &startup, &VanishingLinks);

    assert_eq!(removed, 2);
    assert!(!startup.join("Umi-OCR.lnk").exists());
    assert!(!startup.join("Umi-OCR (1).lnk").exists());
    assert!(!startup.join("gone.lnk").exists());
}

#[test]
fn delete_on_missing_directory_returns_zero() {
    let dir = unique_temp_dir("umi-core-shortcut-missing");
    let _cleanup = CleanupDir(dir.clone());
    let app = AppInfo::new("Umi-OCR", None);

    assert_eq!(
        delete_shortcuts(&app, &roots_in(&dir).resolve(ShortcutPosition::Startup), &TextLinks),
        0
    );
}

struct CleanupDir(PathBuf);

impl Drop for CleanupDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}
