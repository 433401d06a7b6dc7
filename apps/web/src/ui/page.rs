//! Page shell: header, the two sections, inline styles and the browser-side
//! script for drag-and-drop and live precondition checks.
//!
//! The script only improves feedback; every rule it applies is enforced again
//! by [`crate::ui::upload_form::UploadForm`] when the form is posted.

const STYLES: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; background: #f4f6fb; color: #1f2933; }
.app-header { background: linear-gradient(135deg, #4f46e5, #7c3aed); color: #fff; padding: 2rem 0; }
.app-header h1 { margin: 0 0 .5rem; }
.app-header p { margin: 0; opacity: .9; }
.container { max-width: 1200px; margin: 0 auto; padding: 0 1.5rem; }
.app-main { padding: 2rem 0; }
.grid { display: grid; grid-template-columns: minmax(280px, 1fr) 2fr; gap: 2rem; align-items: start; }
.grid.single { grid-template-columns: minmax(280px, 560px); }
.resume-upload, .portfolio-preview { background: #fff; border-radius: 12px; padding: 1.5rem; box-shadow: 0 2px 12px rgba(15, 23, 42, .08); }
.form-group { margin-bottom: 1.25rem; }
.form-group label { display: block; font-weight: 600; margin-bottom: .4rem; }
.model-select, .api-key-input { width: 100%; padding: .6rem; border: 1px solid #cbd2e1; border-radius: 8px; font-size: 1rem; }
.model-hint, .api-hint, .file-types { font-size: .85rem; color: #62708a; margin: .4rem 0 0; }
.drop-zone { position: relative; border: 2px dashed #a5b4fc; border-radius: 12px; padding: 2rem 1rem; text-align: center; cursor: pointer; transition: background .2s; }
.drop-zone.dragging { background: #eef2ff; border-color: #4f46e5; }
.file-input { position: absolute; inset: 0; opacity: 0; cursor: pointer; }
.file-info { display: flex; gap: .5rem; align-items: baseline; margin-top: 1rem; flex-wrap: wrap; }
.file-name { font-weight: 600; margin: 0; }
.file-size { color: #62708a; margin: 0; }
.file-warning { color: #b45309; font-size: .85rem; margin: 0; width: 100%; }
.submit-btn { margin-top: 1.25rem; width: 100%; padding: .8rem; border: 0; border-radius: 8px; background: #4f46e5; color: #fff; font-size: 1rem; cursor: pointer; }
.submit-btn:disabled { background: #a5b4fc; cursor: not-allowed; }
.message { margin-top: 1rem; padding: .75rem; border-radius: 8px; }
.message.success { background: #ecfdf5; color: #047857; }
.message.error { background: #fef2f2; color: #b91c1c; }
.message.warning { background: #fffbeb; color: #b45309; }
.message.progress { background: #eef2ff; color: #4338ca; }
.preview-header { display: flex; justify-content: space-between; align-items: center; }
.download-btn { background: #059669; color: #fff; padding: .5rem 1rem; border-radius: 8px; text-decoration: none; }
.preview-container { margin-top: 1rem; border: 1px solid #e2e8f0; border-radius: 8px; overflow: hidden; }
.preview-iframe { width: 100%; height: 75vh; border: 0; background: #fff; }
.error-message { background: #fef2f2; color: #b91c1c; padding: 1rem; border-radius: 8px; white-space: pre-wrap; }
@media (max-width: 900px) { .grid { grid-template-columns: 1fr; } }
"#;

const SCRIPT: &str = r#"
(function () {
  var form = document.getElementById('upload-form');
  if (!form) { return; }
  var zone = form.querySelector('.drop-zone');
  var input = form.querySelector('.file-input');
  var select = document.getElementById('model-select');
  var hint = document.getElementById('model-hint');
  var keyGroup = document.getElementById('api-key-group');
  var keyInput = document.getElementById('api-key');
  var info = form.querySelector('.file-info');
  var button = form.querySelector('.submit-btn');
  var status = document.getElementById('status-message');

  function selectedOption() { return select ? select.options[select.selectedIndex] : null; }
  function requiresKey() { var o = selectedOption(); return !!o && o.dataset.requiresKey === 'true'; }
  function hasFile() { return (input.files && input.files.length > 0) || form.dataset.heldFile === 'true'; }

  function showStatus(text, kind) {
    status.textContent = text;
    status.className = 'message' + (kind ? ' ' + kind : '');
    status.hidden = !text;
  }

  function refresh() {
    var o = selectedOption();
    if (o && hint) { hint.textContent = o.dataset.hint; }
    if (keyGroup) { keyGroup.hidden = !requiresKey(); }
    var keyOk = !requiresKey() || (keyInput && keyInput.value.trim() !== '');
    button.disabled = form.dataset.inFlight === 'true' || !hasFile() || !keyOk;
  }

  function fileChosen() {
    var file = input.files[0];
    info.querySelector('.file-name').textContent = file.name;
    info.querySelector('.file-size').textContent = '(' + (file.size / 1024).toFixed(2) + ' KB)';
    var warning = info.querySelector('.file-warning');
    if (warning) { warning.remove(); }
    info.hidden = false;
    showStatus('', '');
    refresh();
  }

  zone.addEventListener('dragover', function (e) { e.preventDefault(); zone.classList.add('dragging'); });
  zone.addEventListener('dragleave', function () { zone.classList.remove('dragging'); });
  zone.addEventListener('drop', function (e) {
    e.preventDefault();
    zone.classList.remove('dragging');
    var files = e.dataTransfer.files;
    if (files.length > 0) {
      var first = new DataTransfer();
      first.items.add(files[0]);
      input.files = first.files;
      fileChosen();
    }
  });
  input.addEventListener('change', function () { if (input.files.length > 0) { fileChosen(); } });
  if (select) { select.addEventListener('change', refresh); }
  if (keyInput) { keyInput.addEventListener('input', refresh); }
  form.addEventListener('submit', function (e) {
    if (button.disabled) { e.preventDefault(); return; }
    form.dataset.inFlight = 'true';
    button.disabled = true;
    showStatus('Generating your portfolio...', 'progress');
  });
  refresh();
})();
"#;

/// Assembles the full HTML document around the rendered sections.
/// An empty `preview` means no result has arrived yet and the section is omitted.
pub fn render_document(form: &str, preview: &str, loading: bool) -> String {
    let preview_section = if preview.is_empty() {
        String::new()
    } else {
        format!("<div class=\"preview-section\">\n{preview}</div>\n")
    };
    let grid_class = if preview.is_empty() { "grid single" } else { "grid" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Resume to Portfolio Generator</title>
<style>{STYLES}</style>
</head>
<body data-loading="{loading}">
<header class="app-header">
<div class="container">
<h1>Resume to Portfolio Generator</h1>
<p>Transform your resume into a stunning portfolio website</p>
</div>
</header>
<main class="app-main">
<div class="container">
<div class="{grid_class}">
<div class="upload-section">
{form}</div>
{preview_section}</div>
</div>
</main>
<script>{SCRIPT}</script>
</body>
</html>
"#
    )
}
