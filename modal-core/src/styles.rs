//! Default stylesheet, injected once per process.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::host::Host;

static INSTALLED: AtomicBool = AtomicBool::new(false);

pub const DEFAULT_CSS: &str = r#"
:root {
  --modal-overlay-bg: rgba(0, 0, 0, 0.55);
  --modal-bg: #fff;
  --modal-radius: 8px;
  --modal-max-width: 640px;
  --modal-accent: #246bfd;
  --modal-dock-size: 56px;
}
.modal-overlay {
  position: fixed; inset: 0; z-index: 1000;
  display: flex; align-items: center; justify-content: center;
  background: var(--modal-overlay-bg);
  animation: modal-overlay-in .18s ease;
}
.modal-overlay.hidden { opacity: 0; pointer-events: none; transition: opacity .18s ease; }
@keyframes modal-overlay-in { from { opacity: 0 } to { opacity: 1 } }
.modal-dialog {
  position: relative; display: flex; flex-direction: column; overflow: hidden;
  width: calc(100% - 48px); max-width: var(--modal-max-width);
  background: var(--modal-bg); border-radius: var(--modal-radius);
  box-shadow: 0 10px 30px rgba(0, 0, 0, 0.25);
  transition: width .18s ease, height .18s ease, left .12s ease, top .12s ease;
}
.modal-dialog:focus { outline: none; }
.modal-dialog.dragging { transition: none; z-index: 2000; box-shadow: 0 18px 40px rgba(0, 0, 0, 0.35); }
.modal-dialog.mac-maximized { width: calc(100% - 36px); height: calc(100% - 48px); max-width: none; }
.modal-header { display: flex; align-items: center; justify-content: space-between; padding: 16px; border-bottom: 1px solid #eee; }
.modal-title { margin: 0; font-size: 1.05rem; font-weight: 600; }
.modal-close { background: transparent; border: 0; padding: 6px; margin-left: 12px; cursor: pointer; font-size: 16px; color: #666; }
.modal-content { padding: 16px; max-height: 70vh; overflow: auto; }
.modal-footer { display: flex; justify-content: flex-end; gap: 12px; padding: 12px 16px 16px; border-top: 1px solid #eee; }
.btn { padding: 8px 12px; border-radius: 6px; border: 1px solid #d0d5dd; background: #fff; cursor: pointer; }
.btn-primary { background: var(--modal-accent); color: #fff; border-color: transparent; }
.btn-danger { background: #e74c3c; color: #fff; border-color: transparent; }
.mac-titlebar {
  display: flex; align-items: center; gap: 8px; padding: 10px 12px;
  border-bottom: 1px solid #e9e9ea; background: linear-gradient(#f7f7f8, #f3f3f4);
  user-select: none; cursor: grab; touch-action: none;
}
.mac-titlebar:active { cursor: grabbing; }
.mac-left { display: flex; align-items: center; gap: 8px; margin-right: 8px; }
.mac-btn { width: 12px; height: 12px; padding: 0; border-radius: 50%; border: 1px solid rgba(0, 0, 0, 0.06); cursor: pointer; }
.mac-btn.red { background: #ff5f57; }
.mac-btn.yellow { background: #ffbd2e; }
.mac-btn.green { background: #28c840; }
.mac-title { flex: 1; margin: 0; text-align: center; font-weight: 600; font-size: .95rem; color: #222; pointer-events: none; }
#modal-dock {
  position: fixed; right: 16px; bottom: 16px; z-index: 1200;
  display: flex; gap: 8px; align-items: end; pointer-events: none;
}
.modal-dock-item {
  width: var(--modal-dock-size); height: var(--modal-dock-size); padding: 6px;
  display: flex; flex-direction: column; align-items: center; justify-content: center;
  background: rgba(255, 255, 255, 0.98); border-radius: 10px; box-shadow: 0 6px 18px rgba(0, 0, 0, 0.18);
  font-size: 12px; cursor: pointer; pointer-events: auto; user-select: none;
  transition: transform .12s ease;
}
.modal-dock-item:hover { transform: translateY(-6px); }
.modal-dock-icon {
  width: 28px; height: 28px; border-radius: 6px; display: flex; align-items: center; justify-content: center;
  background: var(--modal-accent); color: #fff; font-weight: 600;
}
.modal-dock-label { margin-top: 4px; font-size: 11px; }
@media (max-width: 480px) {
  .modal-dialog { width: calc(100% - 24px); }
  #modal-dock { right: 8px; bottom: 8px; }
}
"#;

/// Inject [`DEFAULT_CSS`] unless some earlier call already did.
///
/// Returns `true` if this call performed the injection.
pub fn ensure_installed<H: Host>(host: &H) -> bool {
    if INSTALLED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return false;
    }

    host.inject_stylesheet(DEFAULT_CSS);
    log::debug!("installed default modal stylesheet");
    true
}

pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::Acquire)
}
