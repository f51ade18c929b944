//! Listing page markup used by tests across the crate.

use std::fmt::Write;

/// One story row plus its subtext row.
#[derive(Debug, Clone)]
pub struct StoryFixture {
    pub id: u64,
    pub title: &'static str,
    pub href: Option<&'static str>,
    pub score: Option<&'static str>,
    pub author: Option<&'static str>,
    pub age: &'static str,
    pub comments: Option<&'static str>,
}

impl StoryFixture {
    pub fn new(id: u64, title: &'static str) -> Self {
        Self {
            id,
            title,
            href: Some("https://example.com/story"),
            score: Some("10 points"),
            author: Some("pg"),
            age: "1 hour ago",
            comments: Some("5&nbsp;comments"),
        }
    }

    fn render(&self, rank: usize, out: &mut String) {
        let id = self.id;
        let anchor = match self.href {
            Some(href) => format!(r#"<a href="{href}">{}</a>"#, self.title),
            None => String::new(),
        };
        write!(
            out,
            r#"<tr class="athing submission" id="{id}">
  <td align="right" valign="top" class="title"><span class="rank">{rank}.</span></td>
  <td valign="top" class="votelinks"><center><a id="up_{id}" href="vote?id={id}&amp;how=up"><div class="votearrow" title="upvote"></div></a></center></td>
  <td class="title"><span class="titleline">{anchor}<span class="sitebit comhead"> (<a href="from?site=example.com"><span class="sitestr">example.com</span></a>)</span></span></td>
</tr>
<tr><td colspan="2"></td><td class="subtext"><span class="subline">"#
        )
        .unwrap();

        if let Some(score) = self.score {
            write!(out, r#"<span class="score" id="score_{id}">{score}</span> by "#).unwrap();
        }
        if let Some(author) = self.author {
            write!(out, r#"<a href="user?id={author}" class="hnuser">{author}</a> "#).unwrap();
        }
        write!(
            out,
            r#"<span class="age" title="2024-05-01T09:00:00 1714554000"><a href="item?id={id}">{}</a></span> <span id="unv_{id}"></span> | <a href="hide?id={id}&amp;goto=news">hide</a>"#,
            self.age
        )
        .unwrap();
        if let Some(comments) = self.comments {
            write!(out, r#" | <a href="item?id={id}">{comments}</a>"#).unwrap();
        }
        out.push_str("</span></td></tr>\n<tr class=\"spacer\" style=\"height:5px\"></tr>\n");
    }
}

/// A complete listing document containing `stories`, with a "More" link when
/// `has_more` is set.
pub fn listing_page(stories: &[StoryFixture], has_more: bool, next_page: u32) -> String {
    let mut rows = String::new();
    for (rank, story) in stories.iter().enumerate() {
        story.render(rank + 1, &mut rows);
    }
    if has_more {
        write!(
            rows,
            r#"<tr class="morespace" style="height:10px"></tr>
<tr><td colspan="2"></td><td class="title"><a href="?p={next_page}" class="morelink" rel="next">More</a></td></tr>
"#
        )
        .unwrap();
    }
    format!(
        r#"<html lang="en"><head><title>Hacker News</title></head><body><center>
<table id="hnmain" border="0" cellpadding="0" cellspacing="0" width="85%">
<tr><td><table border="0" cellpadding="0" cellspacing="0" class="itemlist"><tbody>
{rows}</tbody></table></td></tr>
</table></center></body></html>"#
    )
}

/// A job post row: no score, no author, no comments link.
pub fn job_row(id: u64, title: &'static str) -> StoryFixture {
    StoryFixture {
        id,
        title,
        href: Some("https://jobs.example.com/apply"),
        score: None,
        author: None,
        age: "2 hours ago",
        comments: None,
    }
}
