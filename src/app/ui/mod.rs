mod controls;
mod panels;
mod search;
mod widgets;
