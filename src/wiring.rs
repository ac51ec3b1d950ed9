// src/wiring.rs
//
// Browser-side glue for rendered tables. Emitted once per page, after the
// widget script. Native counterparts of the filter translation live in
// `filter` (wildcard_to_regex, LiveSearch).

pub const SCRIPT_ID: &str = "toh-wiring";

pub fn get_css() -> &'static str {
    r#"
    table.toh th {
        max-width: 0;
        white-space: nowrap;
        overflow: hidden;
        text-overflow: ellipsis;
    }
    table.toh tr.filters input {
        width: 100%;
        box-sizing: border-box;
    }
    "#
}

pub fn get_js() -> &'static str {
    r#"
(function ($) {
    'use strict';

    function wildcardToRegex(text) {
        var out = '';
        for (var i = 0; i < text.length; i++) {
            var c = text.charAt(i);
            if (c === '*') out += '.*';
            else if (c === '?') out += '.';
            else out += c.replace(/[.*+?^${}()|[\]\\\/-]/g, '\\$&');
        }
        return out;
    }

    function readJson(el, name, fallback) {
        var raw = el.getAttribute(name);
        if (!raw) return fallback;
        try { return JSON.parse(raw); } catch (e) { return fallback; }
    }

    function wire(table) {
        if (table.getAttribute('data-rotate') === 'true') return;

        var api = $(table).DataTable({
            dom: table.getAttribute('data-dom') || 'lfrtip',
            paging: table.getAttribute('data-paging') !== 'false',
            pageLength: parseInt(table.getAttribute('data-page-length') || '50', 10),
            orderCellsTop: true,
            order: readJson(table, 'data-order', []),
            columnDefs: [
                { orderable: false, targets: readJson(table, 'data-unorderable', []) }
            ]
        });

        $(table).find('tr.filters th').each(function (colIdx, th) {
            $(th).children('input')
                .off('keyup change')
                .on('keyup change', function (e) {
                    e.stopPropagation();
                    $(this).attr('title', $(this).val());
                    var cursor = this.selectionStart;
                    var value = this.value;
                    var column = api.column(colIdx);
                    if (value !== '')
                        column.search(wildcardToRegex(value), true, false);
                    else
                        column.search('');
                    api.draw();
                    $(this).focus()[0].setSelectionRange(cursor, cursor);
                });
        });
    }

    $(function () {
        $('table.toh').each(function (_, table) { wire(table); });
    });
})(jQuery);
"#
}

/// `<style>` + `<script>` block appended once before `</body>`.
pub fn page_markup() -> String {
    format!(
        "<style>{}</style>\n<script id=\"{}\">{}</script>\n",
        get_css(),
        SCRIPT_ID,
        get_js()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_reads_table_attributes() {
        let js = get_js();
        for attr in ["data-dom", "data-paging", "data-page-length", "data-order", "data-unorderable"] {
            assert!(js.contains(attr), "{attr}");
        }
        assert!(js.contains("stopPropagation"));
        assert!(js.contains("setSelectionRange"));
    }

    #[test]
    fn markup_carries_marker_id() {
        assert!(page_markup().contains(r#"id="toh-wiring""#));
    }
}
