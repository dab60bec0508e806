//! Integration tests for end-to-end reconstruction.

use unlayout::merge::{escape_markdown, format_block, join_lines, merge_page, merge_spans};
use unlayout::tags::{find_tags, split_trailing_tags, strip_tags, LineTag, Tag};
use unlayout::{
    reconstruct, to_markdown, BBox, Block, BlockType, Line, Page, RenderOptions, Span,
};

fn page_box() -> BBox {
    BBox::new(0.0, 0.0, 612.0, 792.0)
}

fn line_box(y: f32) -> BBox {
    BBox::new(72.0, y, 540.0, y + 10.0)
}

fn text_block(id: u32, y: f32, lines: &[&str]) -> Block {
    let mut block = Block::new(BlockType::Text, line_box(y)).with_id(id);
    for (i, text) in lines.iter().enumerate() {
        // 30 units apart, so layout alone never joins them
        let bbox = line_box(y + i as f32 * 30.0);
        block = block.with_line(Line::plain(*text, bbox).with_id(i as u32));
    }
    block
}

fn untagged() -> RenderOptions {
    RenderOptions::default().with_positional_tags(false)
}

// ==================== Span Merger ====================

#[test]
fn test_lines_without_spans_contribute_nothing() {
    let page = Page::new(1, page_box()).with_block(
        Block::new(BlockType::Text, line_box(100.0))
            .with_id(4)
            .with_line(Line::new(line_box(100.0), vec![]).with_id(0))
            .with_line(Line::plain("Visible text.", line_box(130.0)).with_id(1)),
    );

    let merged = merge_page(&page, &RenderOptions::default());
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].lines.len(), 1);
    assert_eq!(merged[0].lines[0].text, "Visible text. [[1_4_1]]");

    let result = reconstruct(&[page], &RenderOptions::default());
    assert!(!result.markdown.contains("[[1_4_0]]"));
    assert_eq!(result.stats.lines_dropped, 1);
}

#[test]
fn test_empty_page_yields_one_placeholder() {
    let pages = vec![
        Page::new(1, page_box()).with_block(text_block(0, 100.0, &["Page one."])),
        Page::new(2, page_box())
            .with_block(Block::new(BlockType::Text, line_box(100.0)).with_line(Line::new(
                line_box(100.0),
                vec![],
            )))
            .with_block(Block::new(BlockType::Figure, line_box(300.0))),
    ];

    let merged = merge_spans(&pages, &RenderOptions::default());
    assert_eq!(merged[1].len(), 1);
    assert!(merged[1][0].lines.is_empty());
    assert_eq!(merged[1][0].block_type, BlockType::Text);
    assert_eq!(merged[1][0].bbox, page_box());
}

#[test]
fn test_positional_tags_round_trip() {
    let pages: Vec<Page> = (1..=3)
        .map(|n| {
            Page::new(n, page_box())
                .with_block(text_block(n * 10, 100.0, &["alpha", "beta"]))
                .with_block(text_block(n * 10 + 1, 300.0, &["gamma"]))
        })
        .collect();

    for (page, merged) in pages.iter().zip(merge_spans(&pages, &RenderOptions::default())) {
        for (block, merged_block) in page.blocks.iter().zip(&merged) {
            for (line, merged_line) in block.lines.iter().zip(&merged_block.lines) {
                let text = &merged_line.text;
                let (_, tail) = split_trailing_tags(text);
                assert_eq!(find_tags(tail).len(), 1, "line {:?}", text);

                let last = find_tags(text).pop().unwrap();
                assert_eq!(
                    last.tag,
                    Tag::Line(LineTag::new(page.number, block.id, line.id))
                );
                assert_eq!(last.range.end, text.len());
            }
        }
    }
}

#[test]
fn test_inline_emphasis() {
    let bbox = line_box(100.0);
    let page = Page::new(1, page_box()).with_block(
        Block::new(BlockType::Text, bbox).with_line(Line::new(
            bbox,
            vec![
                Span::new("The ", bbox),
                Span::new("quick ", bbox).italic(),
                Span::new("brown ", bbox),
                Span::new("Table 4", bbox).bold(),
                Span::new(" fox", bbox),
            ],
        )),
    );
    assert_eq!(
        to_markdown(&[page], &untagged()),
        "The *quick* brown **Table 4** fox"
    );
}

// ==================== Line joining ====================

#[test]
fn test_dehyphenation() {
    assert_eq!(
        join_lines("exam-", "ple of text", &BlockType::Text, false),
        "example of text"
    );

    let page = Page::new(1, page_box()).with_block(text_block(0, 100.0, &["An exam-", "ple of text"]));
    assert_eq!(to_markdown(&[page], &untagged()), "An example of text");
}

#[test]
fn test_sentence_continuation() {
    assert_eq!(
        join_lines("the cat sat on the", "mat.", &BlockType::Text, false),
        "the cat sat on the mat."
    );

    let page = Page::new(1, page_box())
        .with_block(text_block(0, 100.0, &["the cat sat on the", "mat."]));
    assert_eq!(to_markdown(&[page], &untagged()), "the cat sat on the mat.");
}

#[test]
fn test_paragraph_break() {
    let page = Page::new(1, page_box()).with_block(text_block(
        0,
        100.0,
        &["End of sentence.", "A new one starts"],
    ));
    assert_eq!(
        to_markdown(&[page], &untagged()),
        "End of sentence.\n\nA new one starts"
    );
}

#[test]
fn test_geometric_continuation_joins_wrapped_lines() {
    let mut block = Block::new(BlockType::Text, line_box(100.0));
    block = block
        .with_line(Line::plain("Results:", line_box(100.0)))
        .with_line(Line::plain("See below", line_box(112.0)));
    let page = Page::new(1, page_box()).with_block(block);

    assert_eq!(to_markdown(&[page.clone()], &untagged()), "Results: See below");

    let strict = untagged().with_max_block_gap(1.0);
    assert_eq!(to_markdown(&[page], &strict), "Results:\nSee below");
}

#[test]
fn test_text_flows_across_pages() {
    let pages = vec![
        Page::new(1, page_box()).with_block(text_block(0, 700.0, &["a sentence that"])),
        Page::new(2, page_box()).with_block(text_block(0, 60.0, &["keeps going."])),
    ];
    assert_eq!(to_markdown(&pages, &untagged()), "a sentence that keeps going.");
}

#[test]
fn test_cjk_and_thai_terminators() {
    let page = Page::new(1, page_box())
        .with_block(text_block(0, 100.0, &["第一句。", "第二句"]))
        .with_block(
            Block::new(BlockType::Caption, line_box(400.0))
                .with_line(Line::plain("ภาพที่หนึ่งๆ", line_box(400.0)))
                .with_line(Line::plain("ต่อไป", line_box(430.0))),
        );
    let markdown = to_markdown(&[page], &untagged());
    assert_eq!(markdown, "第一句。\n\n第二句\n\n\nภาพที่หนึ่งๆ\n\nต่อไป\n");
}

// ==================== Block formatting ====================

#[test]
fn test_heading_formatting() {
    assert_eq!(
        format_block("results", &BlockType::SectionHeader, Some(2)),
        "\n## Results\n"
    );

    let page = Page::new(1, page_box()).with_block(
        Block::new(BlockType::SectionHeader, line_box(50.0))
            .with_heading_level(2)
            .with_line(Line::plain("results", line_box(50.0))),
    );
    let result = reconstruct(&[page], &untagged());
    assert_eq!(result.blocks[0].text, "\n## Results\n");
    assert_eq!(result.stats.heading_count, 1);
}

#[test]
fn test_heading_level_change_splits_headings() {
    let header = |level: u32, text: &str, y: f32| {
        Block::new(BlockType::SectionHeader, line_box(y))
            .with_heading_level(level)
            .with_line(Line::plain(text, line_box(y)))
    };
    let page = Page::new(1, page_box())
        .with_block(header(1, "chapter one", 50.0))
        .with_block(header(2, "first section", 90.0));

    let result = reconstruct(&[page], &untagged());
    let texts: Vec<&str> = result.blocks.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["\n# Chapter One\n", "\n## First Section\n"]);
}

#[test]
fn test_hyphenated_heading_title_cased_with_tags() {
    let page = Page::new(1, page_box()).with_block(
        Block::new(BlockType::SectionHeader, line_box(50.0))
            .with_id(0)
            .with_heading_level(2)
            .with_line(Line::plain("intro-", line_box(50.0)).with_id(0))
            .with_line(Line::plain("duction", line_box(80.0)).with_id(1)),
    );

    let untagged_text = to_markdown(&[page.clone()], &untagged());
    assert_eq!(untagged_text, "\n## Introduction\n");

    let tagged = to_markdown(&[page], &RenderOptions::default());
    assert_eq!(tagged, "\n## Introduction [[1_0_0]] [[1_0_1]]\n");
    assert_eq!(strip_tags(&tagged), untagged_text);
}

#[test]
fn test_table_wrapped_in_single_newlines() {
    for raw in ["| a |\n| --- |", "\n\n| a |\n| --- |\n\n", "\n| a |\n| --- |"] {
        let page = Page::new(1, page_box()).with_block(
            Block::new(BlockType::Table, line_box(100.0))
                .with_line(Line::plain(raw, line_box(100.0))),
        );
        let result = reconstruct(&[page], &untagged());
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].text, "\n| a |\n| --- |\n");
    }
}

#[test]
fn test_escaping_is_idempotent() {
    for text in ["# not a heading", "a \\# b", "##", "C# and F#", "tag #1 [[1_2_3]]"] {
        let once = escape_markdown(text);
        assert_eq!(escape_markdown(&once), once);
    }
}

#[test]
fn test_text_hashes_escaped_but_tags_intact() {
    let page = Page::new(1, page_box()).with_block(text_block(5, 100.0, &["# 1 item"]));
    let markdown = to_markdown(&[page], &RenderOptions::default());
    assert_eq!(markdown, "\\# 1 item [[1_5_0]]");
}

#[test]
fn test_unknown_block_type_passes_through() {
    let page = Page::new(1, page_box()).with_block(
        Block::new(BlockType::from("Page-footer"), line_box(760.0))
            .with_line(Line::plain("# 12", line_box(760.0))),
    );
    let result = reconstruct(&[page], &untagged());
    assert_eq!(result.blocks[0].block_type, BlockType::Other("Page-footer".into()));
    assert_eq!(result.markdown, "# 12");
}

#[test]
fn test_blocks_carry_identity() {
    let figure = Block::new(BlockType::Figure, line_box(300.0))
        .with_id(42)
        .with_line(Line::plain("diagram", line_box(300.0)));
    let page = Page::new(7, page_box())
        .with_block(text_block(1, 100.0, &["Intro."]))
        .with_block(figure);

    let result = reconstruct(&[page], &untagged());
    let figure: Vec<_> = result.blocks_with_id(42).collect();
    assert_eq!(figure.len(), 1);
    assert_eq!(figure[0].page, Some(7));
    assert_eq!(figure[0].block_type, BlockType::Figure);
}

// ==================== Pagination ====================

#[test]
fn test_pagination_markers_in_order() {
    let pages = vec![
        Page::new(1, page_box()).with_block(text_block(0, 100.0, &["First page."])),
        Page::new(2, page_box()).with_block(text_block(0, 100.0, &["Second page."])),
    ];
    let options = untagged()
        .with_pagination(true)
        .with_page_separator("<<SEP>>\n");

    let result = reconstruct(&pages, &options);
    let markdown = &result.markdown;

    assert_eq!(markdown.matches("<<SEP>>").count(), 2);
    let first = markdown.find("{1}<<SEP>>\n").unwrap();
    let second = markdown.find("{2}<<SEP>>\n").unwrap();
    assert!(first < second);
    assert!(markdown.find("First page.").unwrap() > first);
    assert!(markdown.find("Second page.").unwrap() > second);
    assert_eq!(result.stats.page_marker_count, 2);
}

#[test]
fn test_pagination_keeps_empty_pages() {
    let pages = vec![
        Page::new(1, page_box()),
        Page::new(2, page_box()).with_block(text_block(0, 100.0, &["Only page with text."])),
    ];
    let markdown = to_markdown(&pages, &untagged().with_pagination(true));
    assert!(markdown.contains("{1}"));
    assert!(markdown.contains("{2}"));
    assert!(markdown.find("{1}").unwrap() < markdown.find("{2}").unwrap());
}

#[test]
fn test_parallel_output_matches_sequential() {
    let pages: Vec<Page> = (1..=12)
        .map(|n| {
            Page::new(n, page_box()).with_block(text_block(
                0,
                100.0,
                &["Lorem ipsum dolor sit", "amet, consec-", "tetur adipiscing."],
            ))
        })
        .collect();
    let parallel = reconstruct(&pages, &RenderOptions::default().with_pagination(true));
    let sequential = reconstruct(
        &pages,
        &RenderOptions::default().with_pagination(true).sequential(),
    );
    assert_eq!(parallel.markdown, sequential.markdown);
    assert_eq!(parallel.blocks, sequential.blocks);
}

#[test]
fn test_empty_document() {
    let result = reconstruct(&[], &RenderOptions::default());
    assert_eq!(result.markdown, "");
    assert!(result.blocks.is_empty());
    assert_eq!(result.stats.page_count, 0);
}
