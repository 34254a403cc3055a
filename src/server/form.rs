//! Upload form page served at `GET /`.
//!
//! A single self-contained HTML page: pick a file and a color mode, post it
//! to `/upload`, then show the file link and the QR image.

/// HTML of the upload form.
pub const UPLOAD_FORM_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>QR Drop - Upload</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }
        body {
            background: #f4f4f5;
            color: #18181b;
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            display: flex;
            justify-content: center;
            padding: 48px 16px;
        }
        main {
            background: #ffffff;
            border-radius: 12px;
            box-shadow: 0 4px 24px rgba(0, 0, 0, 0.08);
            padding: 32px;
            width: 100%;
            max-width: 480px;
        }
        h1 {
            font-size: 20px;
            margin-bottom: 24px;
        }
        label {
            display: block;
            font-size: 14px;
            margin-bottom: 16px;
        }
        input[type="file"], select {
            display: block;
            margin-top: 6px;
            width: 100%;
        }
        button {
            background: #18181b;
            border: none;
            border-radius: 8px;
            color: #ffffff;
            cursor: pointer;
            font-size: 14px;
            padding: 10px 16px;
            width: 100%;
        }
        button:disabled {
            opacity: 0.5;
        }
        #result {
            margin-top: 24px;
            font-size: 14px;
            word-break: break-all;
        }
        #result img {
            display: block;
            margin-top: 12px;
            max-width: 100%;
            border-radius: 8px;
        }
        #result img.white {
            background: #18181b;
        }
        .error {
            color: #b91c1c;
        }
    </style>
</head>
<body>
    <main>
        <h1>Upload a file</h1>
        <form id="upload-form">
            <label>
                File
                <input type="file" name="file" required>
            </label>
            <label>
                QR color
                <select name="mode">
                    <option value="black">Black</option>
                    <option value="white">White</option>
                </select>
            </label>
            <button type="submit">Upload</button>
        </form>
        <div id="result"></div>
    </main>
    <script>
        const form = document.getElementById('upload-form');
        const result = document.getElementById('result');

        form.addEventListener('submit', async (event) => {
            event.preventDefault();
            const button = form.querySelector('button');
            const mode = form.elements.mode.value;
            const body = new FormData();
            body.append('file', form.elements.file.files[0]);

            button.disabled = true;
            result.textContent = 'Uploading...';

            try {
                const response = await fetch('/upload?mode=' + encodeURIComponent(mode), {
                    method: 'POST',
                    body,
                });
                if (!response.ok) {
                    const text = await response.text();
                    throw new Error(text || response.statusText);
                }
                const data = await response.json();

                result.replaceChildren();
                const link = document.createElement('a');
                link.href = data.imageUrl;
                link.textContent = data.imageUrl;
                const image = document.createElement('img');
                image.src = data.qrUrl + '?t=' + Date.now();
                image.alt = 'QR code';
                image.className = mode;
                const download = document.createElement('a');
                download.href = data.qrUrl;
                download.download = '';
                download.textContent = 'Download QR code';

                result.append(data.message, document.createElement('br'), link, image, download);
            } catch (error) {
                result.innerHTML = '';
                const message = document.createElement('p');
                message.className = 'error';
                message.textContent = error.message;
                result.append(message);
            } finally {
                button.disabled = false;
            }
        });
    </script>
</body>
</html>
"##;
