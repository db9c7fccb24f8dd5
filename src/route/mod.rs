pub mod blog_page;
