//! HTML reporter: generates a self-contained, browsable artifact report
//!
//! Groups and artifacts are rendered server-side in catalog order. The
//! embedded script only handles expand/collapse, comments and review status,
//! addressing elements by the `data-group` / `data-artifact` ids. The status
//! precedence it rolls up with is emitted from [`Status::rank`].

use crate::ansi::escape_html;
use crate::status::{rollup, Status};
use crate::{ArtifactRecord, Document, GroupSection};
use std::collections::BTreeMap;

/// Escapes serialized JSON so no `</script>` can appear inside the block
fn escape_json_for_script(s: &str) -> String {
    s.replace("</script>", "<\\/script>")
}

/// `1536` -> `1.50 KB`
pub fn format_size(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

const CHEVRON: &str = r#"<svg class="icon chevron" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><polyline points="6 9 12 15 18 9"></polyline></svg>"#;

/// Reporter that generates the HTML document
pub struct HtmlReporter;

impl HtmlReporter {
    pub fn new() -> Self {
        Self
    }

    /// Generate the full HTML report
    pub fn report(&self, doc: &Document) -> String {
        let title = escape_html(&doc.title);

        let mut html = String::with_capacity(65_536);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        html.push_str(&format!("<title>{}</title>\n", title));
        html.push_str(Self::template_style());
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!(
            "<header>\n<div><h1>{}</h1><div class=\"meta\">{} of {} artifacts present</div></div>\n",
            title,
            doc.present_count(),
            doc.artifact_count()
        ));
        html.push_str(Self::template_controls());
        html.push_str("</header>\n<main class=\"container\">\n");
        for section in &doc.groups {
            self.render_group(&mut html, section);
        }
        html.push_str("</main>\n");
        html.push_str("<script>const STATUS_RANK=");
        html.push_str(&escape_json_for_script(&Self::status_rank_json()));
        html.push_str(";</script>\n");
        html.push_str(Self::template_script());
        html.push_str("</body>\n</html>\n");
        html
    }

    fn status_rank_json() -> String {
        let ranks: BTreeMap<&str, u8> = Status::ALL.iter().map(|s| (s.as_str(), s.rank())).collect();
        serde_json::to_string(&ranks).unwrap_or_else(|_| "{}".to_string())
    }

    fn render_group(&self, html: &mut String, section: &GroupSection) {
        let id = escape_html(&section.group.id);
        let element_id = escape_html(&section.group.element_id());
        // Every artifact starts unreviewed; an empty group rolls up to ok.
        let status = rollup(section.records.iter().map(|_| Status::None));

        html.push_str(&format!(
            "<section id=\"{eid}\" class=\"group {cls}\" data-group=\"{id}\">\n\
             <div id=\"{eid}-header\" class=\"group-header\" data-group=\"{id}\">\
             <h2>{id}</h2><span class=\"count\">{present}/{total}</span>{chev}</div>\n\
             <div id=\"{eid}-content\" class=\"group-content\">\n\
             <div id=\"{eid}-summary\" class=\"comments-summary\"><h4>Summary</h4><ul></ul></div>\n",
            eid = element_id,
            cls = status.css_class(),
            id = id,
            present = section.present_count(),
            total = section.records.len(),
            chev = CHEVRON,
        ));
        for record in &section.records {
            self.render_artifact(html, record);
        }
        html.push_str("</div>\n</section>\n");
    }

    fn render_artifact(&self, html: &mut String, record: &ArtifactRecord) {
        let id = escape_html(record.id());
        let group_id = escape_html(&record.definition.group_id);
        let eid = escape_html(&record.definition.element_id());

        html.push_str(&format!(
            "<div id=\"{eid}\" class=\"artifact {cls}\" data-artifact=\"{id}\" data-group=\"{gid}\" data-present=\"{present}\">\n\
             <div id=\"{eid}-header\" class=\"artifact-header\" data-artifact=\"{id}\"><h3>{id}</h3>{badge}{chev}</div>\n\
             <div id=\"{eid}-content\" class=\"artifact-content\">\n",
            eid = eid,
            cls = Status::None.css_class(),
            id = id,
            gid = group_id,
            present = record.present,
            badge = if record.present {
                ""
            } else {
                "<span class=\"badge-missing\">missing</span>"
            },
            chev = CHEVRON,
        ));

        if record.present {
            html.push_str("<div class=\"artifact-info\">\n");
            if let Some(name) = &record.file_name {
                html.push_str(&format!("<p><strong>File:</strong> {}</p>\n", escape_html(name)));
            }
            if let Some(size) = record.size_bytes {
                html.push_str(&format!("<p><strong>Size:</strong> {}</p>\n", format_size(size)));
            }
            if let Some(modified) = record.last_modified {
                html.push_str(&format!(
                    "<p><strong>Last Modified:</strong> {}</p>\n",
                    modified.format("%a %b %d %Y %H:%M:%S UTC")
                ));
            }
            if let Some(digest) = &record.sha256 {
                html.push_str(&format!(
                    "<p><strong>SHA-256:</strong> <code>{}</code></p>\n",
                    digest
                ));
            }
            html.push_str("</div>\n");
            html.push_str("<div class=\"artifact-data\">");
            html.push_str(record.rendered_content.as_deref().unwrap_or(""));
            html.push_str("</div>\n");
        } else {
            html.push_str("<p class=\"missing\">File not present</p>\n");
        }

        html.push_str(&format!(
            "<textarea id=\"{eid}-comment\" data-id=\"{id}\" placeholder=\"Add a comment for {id}...\"></textarea>\n\
             <button class=\"save-comment\" data-id=\"{id}\">Save Comment</button>\n\
             <div class=\"status-buttons\">",
            eid = eid,
            id = id,
        ));
        for status in Status::ALL {
            let (label, hint) = match status {
                Status::None => ("Not Reviewed", "No status set"),
                Status::Ok => ("OK", "Mark as OK"),
                Status::Error => ("Needs Attention", "Mark as Needs Attention"),
            };
            html.push_str(&format!(
                "<button class=\"status-button status-button-{s}{active}\" data-status=\"{s}\" data-id=\"{id}\" title=\"{hint}\">{label}</button>",
                s = status,
                active = if status == Status::None { " active" } else { "" },
                id = id,
                hint = hint,
                label = label,
            ));
        }
        html.push_str("</div>\n</div>\n</div>\n");
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_style() -> &'static str {
        r##"<style>
:root{--bg:#fff;--fg:#000;--card:#fff;--muted:#f1f5f9;--muted-fg:#64748b;--border:#e2e8f0;--primary:#000;--primary-fg:#fff;--ok:#22c55e;--error:#ef4444;--radius:.5rem}
.dark{--bg:#000;--fg:#fff;--card:#000;--muted:#1e293b;--muted-fg:#94a3b8;--border:#1e293b;--primary:#fff;--primary-fg:#000}
*{box-sizing:border-box}
body{font-family:Arial,sans-serif;line-height:1.6;margin:0;background:var(--bg);color:var(--fg);transition:background-color .3s,color .3s}
header{position:sticky;top:0;z-index:10;display:flex;justify-content:space-between;align-items:center;padding:20px;background:var(--card);box-shadow:0 2px 4px rgba(0,0,0,.1)}
header h1{margin:0;font-size:24px}
header .meta{font-size:.8125rem;color:var(--muted-fg)}
.controls{display:flex;align-items:center;gap:20px}
.container{max-width:1200px;margin:0 auto;padding:20px}

/* ── Groups & artifacts ── */
.group{background:var(--card);border-radius:var(--radius);margin-bottom:20px;overflow:hidden;box-shadow:0 4px 6px rgba(0,0,0,.1)}
.group-header,.artifact-header{display:flex;align-items:center;gap:.75rem;cursor:pointer}
.group-header{background:var(--muted);padding:15px}
.group-header h2{margin:0;font-size:20px;flex:1}
.group-header .count{font-size:.8125rem;color:var(--muted-fg)}
.group-content,.artifact-content{display:none}
.group-content.open,.artifact-content.open{display:block}
.group-content{padding:20px}
.artifact{background:var(--bg);border:1px solid var(--border);border-radius:var(--radius);margin-bottom:15px;overflow:hidden}
.artifact-header{background:var(--muted);padding:10px 15px}
.artifact-header h3{margin:0;font-size:18px;flex:1}
.artifact-content{padding:15px}
.artifact-info{font-size:14px;color:var(--muted-fg);margin-bottom:10px}
.artifact-info p{margin:0}
.artifact-data{background:var(--muted);padding:10px;border-radius:var(--radius);max-height:300px;overflow-y:auto;font-family:monospace;white-space:pre-wrap;word-wrap:break-word}
.missing{color:var(--muted-fg);font-style:italic}
.badge-missing{font-size:.75rem;padding:1px 6px;border-radius:3px;background:var(--border);color:var(--muted-fg)}
.icon{width:24px;height:24px;fill:none;stroke:currentColor;stroke-width:2;transition:transform .2s}
.group-header.open .chevron,.artifact-header.open .chevron{transform:rotate(180deg)}

/* ── Review status ── */
.status-none{border-left:5px solid var(--muted-fg)}
.status-ok{border-left:5px solid var(--ok)}
.status-error{border-left:5px solid var(--error)}
textarea{width:100%;min-height:100px;margin-top:10px;padding:10px;border:1px solid var(--border);border-radius:var(--radius);background:var(--muted);color:var(--fg);resize:vertical}
button{background:var(--primary);color:var(--primary-fg);border:none;padding:10px 15px;border-radius:var(--radius);cursor:pointer;font-size:16px}
button:hover{opacity:.9}
.status-buttons{display:flex;gap:10px;margin-top:15px}
.status-button{min-width:150px;border:2px solid var(--border);background:var(--bg);color:var(--fg)}
.status-button.active{border-color:currentColor;background:var(--muted)}
.status-button-ok{color:var(--ok)}
.status-button-error{color:var(--error)}
.comments-summary{margin-bottom:15px;padding:10px;background:var(--muted);border-radius:var(--radius)}
.comments-summary h4{margin:0 0 10px}
.comments-summary ul{list-style:none;padding-left:0;margin:0}
.comments-summary li{margin-bottom:5px}
.comments-summary .artifact-name{font-weight:bold}
.comments-summary .artifact-status{margin-left:5px;padding:2px 5px;border:none;border-radius:3px;font-size:.8em;color:var(--bg)}
.comments-summary .status-none{background:var(--muted-fg)}
.comments-summary .status-ok{background:var(--ok)}
.comments-summary .status-error{background:var(--error)}

/* ── Dark mode switch ── */
.switch{position:relative;display:inline-block;width:60px;height:34px}
.switch input{opacity:0;width:0;height:0}
.slider{position:absolute;inset:0;cursor:pointer;background:var(--muted);border-radius:34px;transition:.4s}
.slider:before{position:absolute;content:"";height:26px;width:26px;left:4px;bottom:4px;background:var(--bg);border-radius:50%;transition:.4s}
input:checked+.slider{background:var(--primary)}
input:checked+.slider:before{transform:translateX(26px)}
</style>
"##
    }

    fn template_controls() -> &'static str {
        r##"<div class="controls">
<label class="switch" title="Dark mode"><input type="checkbox" id="darkModeToggle"><span class="slider"></span></label>
<button id="saveAllComments">Save All Comments</button>
</div>
"##
    }

    fn template_script() -> &'static str {
        r##"<script>
(function(){
'use strict';
const $$=(s,r)=>Array.from((r||document).querySelectorAll(s));
const STATUSES=Object.keys(STATUS_RANK);
/* Older reports stored "check" for ok */
const LEGACY={check:'ok'};

function statusOf(el){return STATUSES.find(s=>el.classList.contains('status-'+s))||'none'}
function setStatusClass(el,s){STATUSES.forEach(x=>el.classList.remove('status-'+x));el.classList.add('status-'+s)}
function rollup(list){return list.reduce((acc,s)=>STATUS_RANK[s]>STATUS_RANK[acc]?s:acc,'ok')}
function artifactEl(id){return $$('.artifact').find(a=>a.dataset.artifact===id)}

function toggle(header){
  const content=header.nextElementSibling;
  const open=content.classList.toggle('open');
  header.classList.toggle('open',open);
}

function updateGroupStatus(group){
  setStatusClass(group,rollup($$('.artifact',group).map(statusOf)));
}

function updateSummary(group){
  const ul=group.querySelector('.comments-summary ul');
  ul.textContent='';
  $$('.artifact',group).forEach(a=>{
    const id=a.dataset.artifact,s=statusOf(a);
    const comment=localStorage.getItem(id+'-comment')||'';
    const li=document.createElement('li');
    const name=document.createElement('span');
    name.className='artifact-name';name.textContent=id+':';
    const badge=document.createElement('span');
    badge.className='artifact-status status-'+s;badge.textContent=s;
    li.append(name,' ',badge);
    if(comment){
      const c=document.createElement('span');
      c.className='artifact-comment';c.textContent=comment;
      li.append(document.createElement('br'),c);
    }
    ul.appendChild(li);
  });
}

function setStatus(id,s){
  s=LEGACY[s]||s;
  if(!(s in STATUS_RANK))s='none';
  const a=artifactEl(id);
  if(!a)return;
  setStatusClass(a,s);
  $$('.status-button',a).forEach(b=>b.classList.toggle('active',b.dataset.status===s));
  const group=a.closest('.group');
  updateGroupStatus(group);
  updateSummary(group);
}

function saveComment(id){
  const a=artifactEl(id);
  if(!a)return;
  localStorage.setItem(id+'-comment',a.querySelector('textarea').value);
  updateSummary(a.closest('.group'));
}

function load(){
  $$('.artifact').forEach(a=>{
    const id=a.dataset.artifact;
    const comment=localStorage.getItem(id+'-comment');
    const status=localStorage.getItem(id+'-status');
    if(comment)a.querySelector('textarea').value=comment;
    if(status)setStatus(id,status);
  });
  $$('.group').forEach(g=>{updateGroupStatus(g);updateSummary(g)});
}

document.getElementById('darkModeToggle').addEventListener('change',e=>document.body.classList.toggle('dark',e.target.checked));
document.getElementById('saveAllComments').addEventListener('click',()=>{
  $$('.artifact').forEach(a=>saveComment(a.dataset.artifact));
  alert('All comments saved successfully!');
});
$$('.group-header,.artifact-header').forEach(h=>h.addEventListener('click',()=>toggle(h)));
$$('.status-button').forEach(b=>b.addEventListener('click',()=>{
  setStatus(b.dataset.id,b.dataset.status);
  localStorage.setItem(b.dataset.id+'-status',b.dataset.status);
}));
$$('.save-comment').forEach(b=>b.addEventListener('click',()=>saveComment(b.dataset.id)));

load();
})();
</script>
"##
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ArtifactCatalog, GroupSpec};
    use chrono::{TimeZone, Utc};

    fn make_doc(catalog: &ArtifactCatalog, present: &[&str]) -> Document {
        let groups = catalog
            .groups()
            .iter()
            .map(|g| GroupSection {
                group: g.clone(),
                records: g
                    .members
                    .iter()
                    .map(|d| {
                        if present.contains(&d.id.as_str()) {
                            ArtifactRecord {
                                definition: d.clone(),
                                present: true,
                                file_name: Some(d.canonical_file_name()),
                                size_bytes: Some(2048),
                                last_modified: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
                                sha256: Some("ab".repeat(32)),
                                rendered_content: Some(
                                    "<span style=\"color:#dc2626;\">FAIL</span>".into(),
                                ),
                            }
                        } else {
                            ArtifactRecord::missing(d.clone())
                        }
                    })
                    .collect(),
            })
            .collect();
        Document {
            title: "job-7 - GitLab Artifacts Report".into(),
            source_dir: "job-7".into(),
            groups,
        }
    }

    #[test]
    fn test_report_contains_structure() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let html = HtmlReporter::new().report(&make_doc(&catalog, &["hadolint"]));

        assert!(html.contains("<title>job-7 - GitLab Artifacts Report</title>"));
        assert!(html.contains("1 of 13 artifacts present"));
        for group in catalog.groups() {
            assert!(html.contains(&format!("data-group=\"{}\"", group.id)));
            assert!(html.contains(&format!("id=\"group-{}\"", group.id)));
        }
        for def in catalog.definitions() {
            assert!(html.contains(&format!("data-artifact=\"{}\"", def.id)));
            assert!(html.contains(&format!("id=\"artifact-{}-comment\"", def.id)));
        }
    }

    #[test]
    fn test_group_and_artifact_ids_do_not_collide() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let html = HtmlReporter::new().report(&make_doc(&catalog, &[]));
        assert_eq!(html.matches("id=\"group-review\"").count(), 1);
        assert_eq!(html.matches("id=\"artifact-review\"").count(), 1);
    }

    #[test]
    fn test_present_artifact_shows_metadata_and_content() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let html = HtmlReporter::new().report(&make_doc(&catalog, &["clamav"]));
        assert!(html.contains("<p><strong>File:</strong> clamav.txt</p>"));
        assert!(html.contains("<p><strong>Size:</strong> 2.00 KB</p>"));
        assert!(html.contains("Fri Mar 01 2024 12:00:00 UTC"));
        assert!(html.contains("<div class=\"artifact-data\"><span style=\"color:#dc2626;\">FAIL</span></div>"));
        assert!(html.contains("data-artifact=\"clamav\" data-group=\"post-build-scan\" data-present=\"true\""));
    }

    #[test]
    fn test_missing_artifact_placeholder() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let html = HtmlReporter::new().report(&make_doc(&catalog, &[]));
        assert_eq!(html.matches("File not present").count(), 13);
        assert!(!html.contains("artifact-data\">"));
    }

    #[test]
    fn test_initial_status_classes() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let html = HtmlReporter::new().report(&make_doc(&catalog, &[]));
        assert!(html.contains("class=\"group status-none\" data-group=\"build\""));
        assert!(html.contains("class=\"artifact status-none\" data-artifact=\"semgrep\""));
    }

    #[test]
    fn test_empty_group_rolls_up_ok() {
        let catalog = ArtifactCatalog::from_groups(&[GroupSpec {
            id: "empty".into(),
            artifacts: vec![],
        }])
        .unwrap();
        let html = HtmlReporter::new().report(&make_doc(&catalog, &[]));
        assert!(html.contains("class=\"group status-ok\" data-group=\"empty\""));
    }

    #[test]
    fn test_status_rank_embedded() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let html = HtmlReporter::new().report(&make_doc(&catalog, &[]));
        assert!(html.contains("const STATUS_RANK={\"error\":2,\"none\":1,\"ok\":0};"));
    }

    #[test]
    fn test_title_is_escaped() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let mut doc = make_doc(&catalog, &[]);
        doc.title = "<img src=x> - Report".into();
        let html = HtmlReporter::new().report(&doc);
        assert!(html.contains("&lt;img src=x&gt; - Report"));
        assert!(!html.contains("<img src=x>"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
    }

    #[test]
    fn test_escape_json_for_script() {
        assert_eq!(
            escape_json_for_script("</script>alert(1)"),
            "<\\/script>alert(1)"
        );
        assert_eq!(escape_json_for_script("normal"), "normal");
    }
}
