mod common;

#[cfg(test)]
mod tests {
    use super::common::{FakeLauncher, FakeMsi, Workspace};
    use chrono::{Duration, Utc};
    use handoff::libs::error::UpdateError;
    use handoff::libs::mode::{Stage2Args, REPORT_SUCCESS_FLAG};
    use handoff::libs::msi::ERROR_SUCCESS;
    use handoff::libs::stage2::{InstallerKind, Stage2, BOOTSTRAPPER_ARGS};
    use handoff::libs::update_state::{State, UpdateState};
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};
    use test_context::{test_context, TestContext};

    const MAIN_EXECUTABLE: &str = "suite";

    /// MSI "fatal error during installation".
    const ERROR_INSTALL_FAILURE: u32 = 1603;

    struct Stage2TestContext {
        ws: Workspace,
    }

    impl TestContext for Stage2TestContext {
        fn setup() -> Self {
            let ws = Workspace::new();
            let mut state = UpdateState::default();
            state.mark_ready_to_install("stale.exe");
            ws.seed(state);
            Stage2TestContext { ws }
        }
    }

    fn stage<'a>(ctx: &'a Stage2TestContext, msi: &'a FakeMsi, launcher: &'a FakeLauncher) -> Stage2<'a> {
        Stage2 {
            store: &ctx.ws.store,
            msi,
            launcher,
            main_executable: MAIN_EXECUTABLE.to_string(),
        }
    }

    fn args(ctx: &Stage2TestContext, installer: PathBuf, relaunch: bool) -> Stage2Args {
        Stage2Args {
            installer,
            install_dir: ctx.ws.install_dir.clone(),
            relaunch,
        }
    }

    #[test]
    fn test_msi_extension_is_case_insensitive() {
        for name in ["update.msi", "update.MSI", "update.Msi", r"C:\Temp\Setup.mSi"] {
            assert_eq!(InstallerKind::from_path(Path::new(name)), InstallerKind::Msi, "{name}");
        }
    }

    #[test]
    fn test_other_extensions_are_bootstrappers() {
        for name in ["setup.exe", "setup.EXE", "setup.msi.exe", "msi", "setup", "setup.msix"] {
            assert_eq!(InstallerKind::from_path(Path::new(name)), InstallerKind::Bootstrapper, "{name}");
        }
    }

    #[test_context(Stage2TestContext)]
    #[test]
    fn test_msi_success_commits_up_to_date_and_deletes_installer(ctx: &mut Stage2TestContext) {
        let installer = ctx.ws.pending_installer("update.MSI");
        let msi = FakeMsi::returning(ERROR_SUCCESS);
        let launcher = FakeLauncher::new();
        let started = Utc::now() - Duration::seconds(1);

        stage(ctx, &msi, &launcher).run(&args(ctx, installer.clone(), false)).unwrap();

        assert_eq!(*msi.installed.borrow(), vec![installer.clone()]);
        assert!(launcher.waited.borrow().is_empty(), "MSI packages never go through the bootstrapper path");
        assert!(!installer.exists());

        let state = ctx.ws.state();
        assert_eq!(state.state, State::UpToDate);
        assert!(state.downloaded_installer_filename.is_none());
        let checked = state.github_update_last_checked_date.unwrap();
        assert!(checked >= started && checked <= Utc::now());
        assert_eq!(ctx.ws.store.writes.get(), 1);
    }

    #[test_context(Stage2TestContext)]
    #[test]
    fn test_msi_failure_leaves_installer_and_state(ctx: &mut Stage2TestContext) {
        let installer = ctx.ws.pending_installer("update.msi");
        let before = ctx.ws.state();
        let msi = FakeMsi::returning(ERROR_INSTALL_FAILURE);
        let launcher = FakeLauncher::new();

        let err = stage(ctx, &msi, &launcher).run(&args(ctx, installer.clone(), true)).unwrap_err();

        assert!(matches!(err, UpdateError::MsiInstall(ERROR_INSTALL_FAILURE)));
        assert!(installer.exists());
        assert_eq!(ctx.ws.state(), before);
        assert_eq!(ctx.ws.store.writes.get(), 0);
        assert!(launcher.launched.borrow().is_empty(), "no relaunch after a failed install");
    }

    #[test_context(Stage2TestContext)]
    #[test]
    fn test_bootstrapper_runs_unattended_and_waits(ctx: &mut Stage2TestContext) {
        let installer = ctx.ws.pending_installer("suite-setup.exe");
        let msi = FakeMsi::returning(ERROR_SUCCESS);
        let launcher = FakeLauncher::exiting_with(0);

        stage(ctx, &msi, &launcher).run(&args(ctx, installer.clone(), false)).unwrap();

        assert!(msi.installed.borrow().is_empty());
        let waited = launcher.waited.borrow();
        assert_eq!(waited.len(), 1);
        assert_eq!(waited[0].0, installer);
        let expected: Vec<OsString> = BOOTSTRAPPER_ARGS.iter().map(OsString::from).collect();
        assert_eq!(waited[0].1, expected);
        assert!(!installer.exists());
        assert_eq!(ctx.ws.state().state, State::UpToDate);
    }

    #[test_context(Stage2TestContext)]
    #[test]
    fn test_bootstrapper_nonzero_exit_fails(ctx: &mut Stage2TestContext) {
        let installer = ctx.ws.pending_installer("suite-setup.exe");
        let msi = FakeMsi::returning(ERROR_SUCCESS);
        let launcher = FakeLauncher::exiting_with(5);

        let err = stage(ctx, &msi, &launcher).run(&args(ctx, installer.clone(), false)).unwrap_err();

        assert!(matches!(err, UpdateError::BootstrapperExit(5)));
        assert!(installer.exists(), "installer is only deleted after a successful install");
        assert_eq!(ctx.ws.store.writes.get(), 0);
    }

    #[test_context(Stage2TestContext)]
    #[test]
    fn test_bootstrapper_spawn_failure_fails(ctx: &mut Stage2TestContext) {
        let installer = ctx.ws.pending_installer("suite-setup.exe");
        let msi = FakeMsi::returning(ERROR_SUCCESS);
        let mut launcher = FakeLauncher::new();
        launcher.exit_code = None;

        let err = stage(ctx, &msi, &launcher).run(&args(ctx, installer, false)).unwrap_err();

        assert!(matches!(err, UpdateError::BootstrapperSpawn(_)));
    }

    #[test_context(Stage2TestContext)]
    #[test]
    fn test_relaunches_main_app_with_success_flag(ctx: &mut Stage2TestContext) {
        let installer = ctx.ws.pending_installer("update.msi");
        let msi = FakeMsi::returning(ERROR_SUCCESS);
        let launcher = FakeLauncher::new();

        stage(ctx, &msi, &launcher).run(&args(ctx, installer, true)).unwrap();

        let launched = launcher.launched.borrow();
        assert_eq!(launched.len(), 1);
        assert_eq!(launched[0].0, ctx.ws.install_dir.join(MAIN_EXECUTABLE));
        assert_eq!(launched[0].1, vec![OsString::from(REPORT_SUCCESS_FLAG)]);
    }

    #[test_context(Stage2TestContext)]
    #[test]
    fn test_no_relaunch_when_flag_unset(ctx: &mut Stage2TestContext) {
        let installer = ctx.ws.pending_installer("update.msi");
        let msi = FakeMsi::returning(ERROR_SUCCESS);
        let launcher = FakeLauncher::new();

        stage(ctx, &msi, &launcher).run(&args(ctx, installer, false)).unwrap();

        assert!(launcher.launched.borrow().is_empty());
    }

    #[test_context(Stage2TestContext)]
    #[test]
    fn test_relaunch_failure_is_post_commit(ctx: &mut Stage2TestContext) {
        let installer = ctx.ws.pending_installer("update.msi");
        let msi = FakeMsi::returning(ERROR_SUCCESS);
        let launcher = FakeLauncher::failing_launch();

        let err = stage(ctx, &msi, &launcher).run(&args(ctx, installer.clone(), true)).unwrap_err();

        assert!(matches!(err, UpdateError::Relaunch { .. }));
        assert!(err.is_post_commit());
        assert_eq!(ctx.ws.state().state, State::UpToDate);
        assert!(!installer.exists());
    }

    #[test_context(Stage2TestContext)]
    #[test]
    fn test_already_removed_installer_is_not_a_failure(ctx: &mut Stage2TestContext) {
        // The bootstrapper may clean up after itself.
        let installer = ctx.ws.pending.join("self-cleaning.exe");
        let msi = FakeMsi::returning(ERROR_SUCCESS);
        let launcher = FakeLauncher::exiting_with(0);

        stage(ctx, &msi, &launcher).run(&args(ctx, installer, false)).unwrap();

        assert_eq!(ctx.ws.state().state, State::UpToDate);
    }
}
