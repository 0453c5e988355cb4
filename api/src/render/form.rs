//! Upload form renderer
//!
//! Renders the batch upload page. Checkbox states mirror the configured
//! stage defaults.

use crate::domain::entities::Operations;

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
        .form-group { margin-bottom: 15px; }
        .checkbox-group { margin-bottom: 10px; }
        .submit-btn { background-color: #4CAF50; color: white; padding: 10px 20px; border: none; border-radius: 4px; cursor: pointer; }
        .submit-btn:hover { background-color: #45a049; }
"#;

fn render_checkbox(buf: &mut String, name: &str, label: &str, checked: bool) {
    buf.push_str("            <div class=\"checkbox-group\">\n");
    buf.push_str(&format!(
        "                <input type=\"checkbox\" id=\"{name}\" name=\"{name}\"{}>\n",
        if checked { " checked" } else { "" }
    ));
    buf.push_str(&format!(
        "                <label for=\"{name}\">{label}</label>\n"
    ));
    buf.push_str("            </div>\n");
}

/// Render the upload page
pub fn render_upload_form(defaults: &Operations) -> String {
    let mut buf = String::new();

    buf.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    buf.push_str("    <meta charset=\"utf-8\">\n");
    buf.push_str("    <title>Product Image Processor</title>\n");
    buf.push_str("    <style>");
    buf.push_str(STYLE);
    buf.push_str("    </style>\n</head>\n<body>\n");
    buf.push_str("    <h1>Product Image Processor</h1>\n");
    buf.push_str(
        "    <form action=\"/process\" method=\"post\" enctype=\"multipart/form-data\">\n",
    );

    // File picker
    buf.push_str("        <div class=\"form-group\">\n");
    buf.push_str(
        "            <label for=\"images\">Select Images (multiple files allowed):</label><br>\n",
    );
    buf.push_str(
        "            <input type=\"file\" id=\"images\" name=\"images\" multiple accept=\"image/*\" required>\n",
    );
    buf.push_str("        </div>\n");

    // Stage toggles
    buf.push_str("        <div class=\"form-group\">\n");
    buf.push_str("            <h3>Processing Options:</h3>\n");
    render_checkbox(&mut buf, "resize", "Resize Images", defaults.resize);
    render_checkbox(
        &mut buf,
        "remove_background",
        "Remove Background",
        defaults.remove_background,
    );
    render_checkbox(&mut buf, "enhance", "Enhance Images", defaults.enhance);
    buf.push_str("        </div>\n");

    buf.push_str(
        "        <input type=\"submit\" value=\"Process Images\" class=\"submit-btn\">\n",
    );
    buf.push_str("    </form>\n</body>\n</html>\n");

    buf
}
