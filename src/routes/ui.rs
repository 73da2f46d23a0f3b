use axum::{response::Html, routing::get, Router};

/// `localStorage` key holding the browser's upload history
pub const HISTORY_STORAGE_KEY: &str = "public_uploaded_files";

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Public File Share</title>
  <style>
    body { margin: 0; min-height: 100vh; background: #111; display: flex; align-items: center; justify-content: center; padding: 24px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; box-sizing: border-box; }
    .box { background: #fff; border-radius: 16px; box-shadow: 0 4px 32px #0002; max-width: 420px; width: 100%; padding: 32px 24px 24px; display: flex; flex-direction: column; }
    h1 { font-size: 2rem; margin: 0 0 18px; color: #222; text-align: center; }
    h2 { font-size: 1.2rem; margin: 24px 0 8px; color: #222; }
    form { display: flex; flex-direction: column; gap: 12px; margin-bottom: 18px; }
    input[type=text] { padding: 8px; border-radius: 6px; border: 1px solid #ccc; }
    button { padding: 10px 0; border: none; border-radius: 6px; background: #222; color: #fff; font-weight: 600; cursor: pointer; }
    button:disabled { background: #888; cursor: default; }
    .error { color: #c00; margin-bottom: 8px; }
    .success { color: #080; margin-bottom: 8px; }
    .link { word-break: break-all; color: #0366d6; }
    ul { list-style: none; padding: 0; margin: 0; }
    li { border-bottom: 1px solid #eee; padding: 8px 0; }
    .date { color: #888; font-size: 0.85rem; margin-left: 6px; }
    .note { color: #555; font-size: 0.9rem; }
    .hidden { display: none; }
  </style>
</head>
<body>
  <div class="box">
    <h1>Public File Share</h1>
    <form id="uploadForm">
      <input id="fileInput" type="file" />
      <input id="noteInput" type="text" placeholder="Add a note (optional)" />
      <button id="uploadBtn" type="submit">Upload File</button>
    </form>
    <div id="error" class="error hidden"></div>
    <div id="success" class="success hidden"></div>
    <div id="linkBox" class="hidden">
      <strong>Public Link:</strong>
      <div><a id="publicLink" class="link" target="_blank" rel="noopener noreferrer"></a></div>
    </div>
    <h2>Uploaded Files</h2>
    <ul id="history"></ul>
  </div>

  <script>
    const STORAGE_KEY = 'public_uploaded_files';
    const form = document.getElementById('uploadForm');
    const fileInput = document.getElementById('fileInput');
    const noteInput = document.getElementById('noteInput');
    const uploadBtn = document.getElementById('uploadBtn');
    const errorBox = document.getElementById('error');
    const successBox = document.getElementById('success');
    const linkBox = document.getElementById('linkBox');
    const publicLink = document.getElementById('publicLink');
    const historyList = document.getElementById('history');

    function loadHistory() {
      try {
        const cached = localStorage.getItem(STORAGE_KEY);
        return cached ? JSON.parse(cached) : [];
      } catch (_) {
        return [];
      }
    }

    let uploadedFiles = loadHistory();

    function saveHistory() {
      localStorage.setItem(STORAGE_KEY, JSON.stringify(uploadedFiles));
    }

    function show(el, text) {
      el.textContent = text || '';
      el.classList.toggle('hidden', !text);
    }

    function setPublicUrl(url) {
      publicLink.textContent = url || '';
      publicLink.href = url || '#';
      linkBox.classList.toggle('hidden', !url);
    }

    function renderHistory() {
      historyList.replaceChildren();
      if (uploadedFiles.length === 0) {
        const empty = document.createElement('li');
        empty.textContent = 'No files uploaded yet.';
        historyList.appendChild(empty);
        return;
      }
      for (const f of uploadedFiles) {
        const item = document.createElement('li');
        const head = document.createElement('div');
        const name = document.createElement('strong');
        name.textContent = f.name;
        const date = document.createElement('span');
        date.className = 'date';
        date.textContent = f.date ? new Date(f.date).toLocaleString() : '';
        head.append(name, date);
        item.appendChild(head);
        if (f.note) {
          const note = document.createElement('div');
          note.className = 'note';
          note.textContent = 'Note: ' + f.note;
          item.appendChild(note);
        }
        const link = document.createElement('a');
        link.className = 'link';
        link.href = f.url;
        link.target = '_blank';
        link.rel = 'noopener noreferrer';
        link.textContent = f.url;
        item.appendChild(link);
        historyList.appendChild(item);
      }
    }

    fileInput.addEventListener('change', () => {
      setPublicUrl(null);
      show(errorBox, '');
      show(successBox, '');
    });

    form.addEventListener('submit', async (e) => {
      e.preventDefault();
      show(errorBox, '');
      show(successBox, '');
      setPublicUrl(null);
      const file = fileInput.files[0];
      if (!file) {
        show(errorBox, 'Please select a file.');
        return;
      }
      const note = noteInput.value;
      uploadBtn.disabled = true;
      uploadBtn.textContent = 'Uploading...';
      try {
        const formData = new FormData();
        formData.append('file', file);
        formData.append('note', note);
        const res = await fetch('/api/upload-public-file', { method: 'POST', body: formData });
        const data = await res.json();
        if (data.success && data.url) {
          show(successBox, 'File uploaded successfully!');
          setPublicUrl(data.url);
          uploadedFiles = [{ url: data.url, name: file.name, note, date: new Date().toISOString() }, ...uploadedFiles];
          saveHistory();
          renderHistory();
          fileInput.value = '';
          noteInput.value = '';
        } else {
          show(errorBox, data.message || 'Upload failed');
        }
      } catch (_) {
        show(errorBox, 'Upload failed');
      } finally {
        uploadBtn.disabled = false;
        uploadBtn.textContent = 'Upload File';
      }
    });

    renderHistory();
  </script>
</body>
</html>"#;
