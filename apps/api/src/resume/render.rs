//! Embedded HTML for the upload form and the result page.
//!
//! The highlighted content is inserted without escaping: the highlighter's
//! output is trusted markup and escaping it would destroy the `<b>`/`<br>`
//! tags it emits.

/// GET / — the upload form.
pub const UPLOAD_FORM: &str = r#"<!DOCTYPE html>
<html lang="zh">
<head>
    <meta charset="utf-8">
    <title>简历上传</title>
</head>
<body>
    <h1>上传简历 (PDF)</h1>
    <form action="/" method="post" enctype="multipart/form-data">
        <input type="file" name="file" accept="application/pdf" required>
        <button type="submit">上传</button>
    </form>
</body>
</html>
"#;

/// Wraps the highlighted resume content into the result page.
pub fn result_page(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh">
<head>
    <meta charset="utf-8">
    <title>简历解析结果</title>
</head>
<body>
    <h1>简历关键信息</h1>
    <div class="resume">{content}</div>
    <p><a href="/">再上传一份</a></p>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_page_embeds_content_verbatim() {
        let page = result_page("<b>姓名</b>: 张三<br>");
        assert!(page.contains("<b>姓名</b>: 张三<br>"));
    }

    #[test]
    fn upload_form_posts_multipart_file_field() {
        assert!(UPLOAD_FORM.contains(r#"enctype="multipart/form-data""#));
        assert!(UPLOAD_FORM.contains(r#"name="file""#));
    }
}
