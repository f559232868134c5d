mod test_pipe_basic;
mod test_triangulation_basic;
