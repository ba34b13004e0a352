#![cfg(windows)]

use std::path::{Path, PathBuf};

use uuid::Uuid;

use umi_core::app::{AppInfo, InstallScope};
use umi_core::error::ErrorKind;
use umi_core::render::select_rendering_backend;
use umi_core::shortcut::{
    create_shortcut, delete_shortcuts, LinkBackend, ShellRoots, ShortcutPosition,
};
use umi_windows::shortcut::{shell_roots, shortcut_dir, ShellLinkBackend};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn fake_exe(dir: &Path, name: &str) -> PathBuf {
    let exe = dir.join(name);
    std::fs::write(&exe, b"MZ").expect("write exe");
    exe
}

#[test]
fn shell_link_round_trip_resolves_target() {
    let dir = unique_temp_dir("umi-windows-lnk");
    let _cleanup = CleanupDir(dir.clone());
    let exe = fake_exe(&dir, "Umi-OCR.exe");
    let link = dir.join("Umi-OCR.lnk");

    ShellLinkBackend.create_link(&exe, &link).expect("create link");
    let target = ShellLinkBackend
        .link_target(&link)
        .expect("resolve link")
        .expect("is a shortcut");

    assert_eq!(target.file_name(), exe.file_name());
    assert_eq!(
        ShellLinkBackend.link_target(&exe).expect("not a link"),
        None
    );
}

#[test]
fn delete_scan_removes_only_links_to_app() {
    let dir = unique_temp_dir("umi-windows-scan");
    let _cleanup = CleanupDir(dir.clone());
    let bin = dir.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let exe = fake_exe(&bin, "Umi-OCR.exe");
    let other = fake_exe(&bin, "Other.exe");

    let roots = ShellRoots {
        desktop: dir.join("Desktop"),
        app_data: dir.join("AppData"),
    };
    let app = AppInfo::new("Umi-OCR", Some(exe));
    let startup = roots.resolve(ShortcutPosition::Startup);
    for _ in 0..3 {
        create_shortcut(&app, &startup, &ShellLinkBackend).expect("create shortcut");
    }
    ShellLinkBackend
        .create_link(&other, &startup.join("Other.lnk"))
        .expect("create unrelated link");
    std::fs::write(startup.join("readme.txt"), "Umi-OCR").unwrap();

    let removed = delete_shortcuts(&app, &startup, &ShellLinkBackend);

    assert_eq!(removed, 3);
    assert!(startup.join("Other.lnk").exists());
    assert!(startup.join("readme.txt").exists());
    assert!(!startup.join("Umi-OCR (2).lnk").exists());
}

#[test]
fn shell_roots_use_scope_environment() {
    let roots = shell_roots(InstallScope::User).expect("user roots");
    let appdata = std::env::var_os("APPDATA").expect("APPDATA");
    assert_eq!(roots.app_data, PathBuf::from(appdata));
    assert!(roots.desktop.is_absolute());
    assert!(roots
        .resolve(ShortcutPosition::Startup)
        .ends_with("Microsoft\\Windows\\Start Menu\\Programs\\Startup"));
}

#[test]
fn shortcut_dir_matches_shell_roots_per_position() {
    let roots = shell_roots(InstallScope::User).expect("user roots");
    for position in ShortcutPosition::ALL {
        assert_eq!(
            shortcut_dir(InstallScope::User, position).expect("shortcut dir"),
            roots.resolve(position),
            "{position}"
        );
    }
}

#[test]
fn os_version_is_dotted_and_drives_backend() {
    let version = umi_windows::version::os_version_string().expect("read version");
    assert_eq!(version.split('.').count(), 3, "{version}");
    assert_eq!(
        umi_windows::version::rendering_backend(),
        select_rendering_backend(&version)
    );
}

#[test]
fn admin_check_does_not_fail() {
    umi_windows::elevation::is_running_as_admin().expect("admin check");
}

#[test]
fn api_queries_and_preconditions() {
    let api = umi_windows::api::Api::new(AppInfo::new("Umi-OCR", None));

    assert_eq!(api.get_key_name(0x41), "a");
    assert_eq!(
        api.get_opengl_use(),
        umi_windows::version::rendering_backend().tag()
    );
    let err = api.create_shortcut(ShortcutPosition::Desktop).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutableNotFound);
    let err = api.create_admin_startup_task().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutableNotFound);
}

struct CleanupDir(PathBuf);

impl Drop for CleanupDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}
