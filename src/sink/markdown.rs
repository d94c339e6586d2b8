//! Markdown rendering of extracted page text.

use crate::model::PageContent;

/// Title line at the top of every text output file.
const TITLE_LINE: &str = "# 学术论文内容提取";

/// Render the combined text document for one source file.
///
/// The output starts with a fixed title line and a source-filename line,
/// then one page-boundary header per page followed by that page's text.
/// Every page contributes a header, even when its text is empty.
pub fn render_markdown(source_name: &str, pages: &[PageContent]) -> String {
    let mut output = String::new();
    output.push_str(TITLE_LINE);
    output.push('\n');
    output.push_str(&format!("来源文件: {}\n", source_name));

    for page in pages {
        output.push_str(&format!("\n\n--- 第 {} 页 ---\n\n", page.number));
        output.push_str(&page.text);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_two_pages() {
        let pages = vec![
            PageContent::new(1, "First page text."),
            PageContent::new(2, "Second page text."),
        ];
        let output = render_markdown("paper1.pdf", &pages);

        let expected = "# 学术论文内容提取\n\
                        来源文件: paper1.pdf\n\
                        \n\n--- 第 1 页 ---\n\n\
                        First page text.\
                        \n\n--- 第 2 页 ---\n\n\
                        Second page text.";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_empty_page_still_gets_header() {
        let pages = vec![
            PageContent::new(1, "Text"),
            PageContent::new(2, ""),
            PageContent::new(3, "More"),
        ];
        let output = render_markdown("doc.pdf", &pages);
        assert_eq!(output.matches("--- 第 ").count(), 3);
        assert!(output.contains("--- 第 2 页 ---"));
    }

    #[test]
    fn test_headers_in_page_order() {
        let pages: Vec<PageContent> = (1..=5)
            .map(|n| PageContent::new(n, format!("p{}", n)))
            .collect();
        let output = render_markdown("doc.pdf", &pages);

        let mut last = 0;
        for n in 1..=5 {
            let header = format!("--- 第 {} 页 ---", n);
            let pos = output.find(&header).unwrap();
            assert!(pos > last);
            last = pos;
        }
    }

    #[test]
    fn test_no_pages() {
        let output = render_markdown("empty.pdf", &[]);
        assert_eq!(output, "# 学术论文内容提取\n来源文件: empty.pdf\n");
    }
}
